//! Where the tracked file lived over the project's history.

use serde::{Deserialize, Serialize};
use time::macros::date;

use crate::core::CalDate;

/// One span of the tracked file's relocation history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    /// In-repository path of the tracked file during this span.
    pub path: String,
    /// First commit date covered (inclusive); `None` = from the start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<CalDate>,
    /// First commit date no longer covered (exclusive); `None` = open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<CalDate>,
}

impl PathRule {
    pub fn covers(&self, date: CalDate) -> bool {
        self.from.is_none_or(|from| from <= date) && self.until.is_none_or(|until| date < until)
    }
}

/// The tracked file's three historical locations.
///
/// Boundary dates are deliberately coarse: retrieval tries the covering
/// rule's path first and falls back to the other rules' paths, so a commit
/// near a relocation still resolves (the equivalent of `--follow`).
pub fn default_path_rules() -> Vec<PathRule> {
    vec![
        PathRule {
            path: "src/assets/penalty.json".to_owned(),
            from: None,
            until: Some(CalDate::new(date!(2024 - 08 - 01))),
        },
        PathRule {
            path: "src/assets/data/penalty.json".to_owned(),
            from: Some(CalDate::new(date!(2024 - 08 - 01))),
            until: Some(CalDate::new(date!(2025 - 02 - 01))),
        },
        PathRule {
            path: "web/assets/data/penalty.json".to_owned(),
            from: Some(CalDate::new(date!(2025 - 02 - 01))),
            until: None,
        },
    ]
}

/// Candidate paths for a commit: the covering rule first, then the
/// remaining rules newest-span-first.
pub fn candidate_paths(rules: &[PathRule], date: CalDate) -> Vec<&str> {
    let mut candidates: Vec<&str> = Vec::with_capacity(rules.len());
    if let Some(rule) = rules.iter().find(|r| r.covers(date)) {
        candidates.push(&rule.path);
    }
    for rule in rules.iter().rev() {
        if !candidates.contains(&rule.path.as_str()) {
            candidates.push(&rule.path);
        }
    }
    candidates
}
