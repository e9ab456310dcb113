//! The historical renumbering event table.
//!
//! Every rule carries a reason so the table stays auditable: these entries
//! were reviewed by a human against the tracked file's actual history, and
//! a failed run means this table is stale, not that the code should guess.

use serde::{Deserialize, Serialize};

use crate::core::{CalDate, EntryId, Snapshot};

/// How old and new records are paired when deriving a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Pure renumbering: order and count unchanged, pair by index.
    Positional,
    /// Entries were added/removed alongside the renumbering: pair by
    /// normalized name.
    ByName,
}

/// A declared, reviewed name change across a renumbering event.
///
/// Compared on normalized forms; the literal pair is allow-listed ahead of
/// time, anything else is a fatal mismatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameException {
    pub new_name: String,
    pub old_name: String,
    pub reason: String,
}

/// Where a manual override sends an old identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTarget {
    /// Reuse the derived mapping of another old id (known duplicates).
    SameAs(EntryId),
    /// Explicit target, used for collision splits into decimal sub-ids and
    /// manually resolved ambiguous cases.
    Explicit { new_id: EntryId, name: String },
}

/// A reviewed mapping entry applied after derivation, taking precedence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManualOverride {
    pub old_id: EntryId,
    pub target: OverrideTarget,
    pub reason: String,
}

/// One historical renumbering of the tracked list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenumberingEvent {
    /// Date the renumbering landed.
    pub date: CalDate,
    /// Commit carrying the last old-scheme list.
    pub source_commit: String,
    /// Commit carrying the first new-scheme list.
    pub target_commit: String,
    pub pairing: PairingMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<NameException>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ManualOverride>,
}

impl RenumberingEvent {
    /// Whether a snapshot predates this event and must be rewritten.
    ///
    /// The source commit itself still carries the old scheme even though
    /// it shares the event date, so it is included explicitly.
    pub fn applies_to(&self, snapshot: &Snapshot) -> bool {
        snapshot.commit.date < self.date || snapshot.commit.id == self.source_commit
    }
}

/// The reviewed event table for the tracked file.
pub fn builtin_events() -> Vec<RenumberingEvent> {
    vec![RenumberingEvent {
        date: CalDate::new(time::macros::date!(2024 - 11 - 18)),
        source_commit: "987ff4686d1d4d1658de1bf6ab7ca9e251cd1a95".to_owned(),
        target_commit: "5c1e4f7e20328f18fcde218024319959eae3aebd".to_owned(),
        pairing: PairingMode::Positional,
        exceptions: vec![
            NameException {
                new_name: "玩slimemo".to_owned(),
                old_name: "玩smilemo".to_owned(),
                reason: "typo fixed during renumbering".to_owned(),
            },
            NameException {
                new_name: "打完星鐵主線(\u{fe0f}雅利洛-VI)".to_owned(),
                old_name: "打完星鐵主線".to_owned(),
                reason: "scope annotation added to the title".to_owned(),
            },
            NameException {
                new_name: "直播遊玩黎明死線倖存者或殺手，直到熒虹徽章20個(\u{fe0f}已完成**4**/20個)"
                    .to_owned(),
                old_name: "直播遊玩黎明死線倖存者或殺手，直到熒虹徽章20個".to_owned(),
                reason: "progress annotation added to the title".to_owned(),
            },
            NameException {
                new_name: "通關冰與火之歌前七關卡".to_owned(),
                old_name: "通關冰與火之舞前七關卡".to_owned(),
                reason: "game title retyped (之舞 → 之歌)".to_owned(),
            },
        ],
        overrides: vec![ManualOverride {
            old_id: EntryId::from_int(96),
            target: OverrideTarget::SameAs(EntryId::from_int(97)),
            reason: "SkyBlock 100等 was listed twice under adjacent ids".to_owned(),
        }],
    }]
}
