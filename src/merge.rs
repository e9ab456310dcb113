//! Latest merger: attach computed histories to the current entry list.

use serde::Serialize;
use thiserror::Error;

use crate::core::{EntryRecord, History, HistoryMap, Snapshot};
use crate::error::FailureScope;
use crate::report::{Report, Stage};

/// Per-record merge failures. Reported and isolated, never fatal to the
/// batch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MergeError {
    #[error("no history for entry {id} ({name:?})")]
    MissingHistory {
        id: crate::core::EntryId,
        name: String,
    },
}

impl MergeError {
    pub fn scope(&self) -> FailureScope {
        match self {
            MergeError::MissingHistory { .. } => FailureScope::Record,
        }
    }
}

/// A current entry enriched with its full history. The `date` field is
/// corrected to the first transition's date; every other source field
/// passes through unchanged.
#[derive(Clone, Debug, Serialize)]
pub struct LatestRecord {
    #[serde(flatten)]
    pub entry: EntryRecord,
    pub history: History,
}

/// Merge the history map into the latest snapshot's entries.
///
/// Output preserves the input entry ordering. Entries without a history
/// (including the reserved invalid id, whose history was deleted) are
/// dropped with a diagnostic.
pub fn merge_latest(
    histories: &HistoryMap,
    latest: &Snapshot,
    report: &mut Report,
) -> Vec<LatestRecord> {
    let mut records = Vec::with_capacity(latest.entries.len());
    for entry in &latest.entries {
        let Some(history) = histories.get(&entry.id).filter(|h| !h.is_empty()) else {
            let err = MergeError::MissingHistory {
                id: entry.id,
                name: entry.name.clone(),
            };
            report.warn(Stage::Merge, err.to_string());
            continue;
        };
        let mut entry = entry.clone();
        if let Some(first) = history.first() {
            entry.date = first.date;
        }
        records.push(LatestRecord {
            entry,
            history: history.clone(),
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalDate, CommitInfo, EntryId, Status, Transition};
    use crate::report::Severity;

    fn d(s: &str) -> CalDate {
        CalDate::parse(s).unwrap()
    }

    fn entry(id: i64, name: &str, date: &str) -> EntryRecord {
        EntryRecord {
            id: EntryId::from_int(id),
            name: name.to_owned(),
            date: d(date),
            status: Some("已完成".to_owned()),
            done: None,
            extra: Default::default(),
        }
    }

    fn latest(entries: Vec<EntryRecord>) -> Snapshot {
        Snapshot {
            commit: CommitInfo {
                id: "head".to_owned(),
                date: d("2025-06-01"),
            },
            entries,
        }
    }

    #[test]
    fn merge_corrects_the_date_and_attaches_history() {
        let mut histories = HistoryMap::new();
        histories.insert(
            EntryId::from_int(1),
            History::seeded(vec![
                Transition::new(Status::NotStarted, d("2023-01-01")),
                Transition::new(Status::Completed, d("2023-02-01")),
            ]),
        );
        let mut report = Report::new();
        let records = merge_latest(
            &histories,
            &latest(vec![entry(1, "任務A", "2024-12-31")]),
            &mut report,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.date, d("2023-01-01"));
        assert_eq!(records[0].history.len(), 2);
        assert_eq!(report.diagnostics().len(), 0);
    }

    #[test]
    fn single_snapshot_round_trip_keeps_the_entry_date() {
        // A history built from one single-status sighting merges back with
        // the same date the snapshot entry carried.
        let mut histories = HistoryMap::new();
        histories.insert(
            EntryId::from_int(1),
            History::seeded(vec![Transition::new(Status::NotStarted, d("2024-05-05"))]),
        );
        let mut report = Report::new();
        let records = merge_latest(
            &histories,
            &latest(vec![entry(1, "任務A", "2024-05-05")]),
            &mut report,
        );
        assert_eq!(records[0].entry.date, d("2024-05-05"));
        assert_eq!(records[0].history.len(), 1);
    }

    #[test]
    fn missing_history_drops_the_record_with_a_diagnostic() {
        let histories = HistoryMap::new();
        let mut report = Report::new();
        let records = merge_latest(
            &histories,
            &latest(vec![entry(1, "任務A", "2024-12-31")]),
            &mut report,
        );
        assert!(records.is_empty());
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn output_preserves_input_ordering() {
        let mut histories = HistoryMap::new();
        for id in [3, 1, 2] {
            histories.insert(
                EntryId::from_int(id),
                History::seeded(vec![Transition::new(Status::NotStarted, d("2024-01-01"))]),
            );
        }
        let mut report = Report::new();
        let records = merge_latest(
            &histories,
            &latest(vec![
                entry(3, "丙", "2024-02-01"),
                entry(1, "甲", "2024-02-01"),
                entry(2, "乙", "2024-02-01"),
            ]),
            &mut report,
        );
        let ids: Vec<_> = records.iter().map(|r| r.entry.id).collect();
        assert_eq!(
            ids,
            vec![
                EntryId::from_int(3),
                EntryId::from_int(1),
                EntryId::from_int(2)
            ]
        );
    }

    #[test]
    fn merged_records_serialize_with_history_inline() {
        let mut histories = HistoryMap::new();
        histories.insert(
            EntryId::from_int(1),
            History::seeded(vec![Transition::new(Status::Completed, d("2023-02-01"))]),
        );
        let mut report = Report::new();
        let records = merge_latest(
            &histories,
            &latest(vec![entry(1, "任務A", "2024-12-31")]),
            &mut report,
        );
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["date"], "2023-02-01");
        assert_eq!(value["history"][0][0], "已完成");
    }
}
