//! Canonical per-entry histories.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::date::CalDate;
use super::id::EntryId;
use super::status::Status;

/// One recorded status change. Serializes as the `[label, date]` pair used
/// by `calc_history.json` and the `history` field of `latest.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub status: Status,
    pub date: CalDate,
}

impl Transition {
    pub fn new(status: Status, date: CalDate) -> Self {
        Self { status, date }
    }
}

impl Serialize for Transition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.status, &self.date).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (status, date) = <(Status, CalDate)>::deserialize(deserializer)?;
        Ok(Transition { status, date })
    }
}

/// Ordered status changes for one entry.
///
/// Only *changes* are recorded: `record` drops an observation whose status
/// equals the last recorded one, so no two consecutive transitions share a
/// status and dates are non-decreasing by construction of the replay pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<Transition>);

impl History {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn seeded(transitions: Vec<Transition>) -> Self {
        Self(transitions)
    }

    /// Append an observation, collapsing consecutive identical statuses.
    pub fn record(&mut self, status: Status, date: CalDate) {
        if self.0.last().map(|t| t.status) != Some(status) {
            self.0.push(Transition::new(status, date));
        }
    }

    pub fn first(&self) -> Option<&Transition> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Transition> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.0.iter()
    }

    /// Invariant check: dates non-decreasing, no consecutive repeats.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| w[0].date <= w[1].date && w[0].status != w[1].status)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Canonical identifier → ordered transitions. BTreeMap keeps artifact
/// output in numeric id order.
pub type HistoryMap = BTreeMap<EntryId, History>;
