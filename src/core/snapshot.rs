//! Snapshots: the tracked entry list as it existed at one revision.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::date::CalDate;
use super::record::EntryRecord;

/// The revision a snapshot was taken from.
///
/// Serializes as the `[hash, date]` pair the `history.json` artifact uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub date: CalDate,
}

impl Serialize for CommitInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.id, &self.date).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CommitInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (id, date) = <(String, CalDate)>::deserialize(deserializer)?;
        Ok(CommitInfo { id, date })
    }
}

/// The full entry list at one revision. Immutable once extracted;
/// reconciliation passes produce new snapshots rather than editing these.
///
/// Serializes as the `[[hash, date], entries]` pair of `history.json`.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub commit: CommitInfo,
    pub entries: Vec<EntryRecord>,
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.commit, &self.entries).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (commit, entries) = <(CommitInfo, Vec<EntryRecord>)>::deserialize(deserializer)?;
        Ok(Snapshot { commit, entries })
    }
}
