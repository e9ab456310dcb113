//! History replay: fold reconciled snapshots into per-entry transition logs.
//!
//! A single forward pass in commit-date order. First sightings are seeded
//! with the implicit earlier states every entry passes through; later
//! sightings append only on change. The pass is followed by the reviewed
//! correction table and removal of the reserved invalid id.

pub mod corrections;
pub mod error;

use time::macros::date;

pub use corrections::{Correction, apply_corrections, builtin_corrections, remove_reserved};
pub use error::ReplayError;

use crate::core::{CalDate, History, HistoryMap, Snapshot, Status, Transition};
use crate::report::{Report, Stage};

/// Commit date excluded from replay: a retroactive bulk edit marked every
/// penalty 已完成 on this day, which taken at face value would end every
/// history early.
pub const BULK_COMPLETION_DATE: CalDate = CalDate::new(date!(2025 - 03 - 17));

/// First date the 未生效 status existed. Before it, entries begin life at
/// 未開始; at or after it, they begin at 未生效.
pub const INACTIVE_CUTOVER: CalDate = CalDate::new(date!(2025 - 03 - 22));

/// Replay snapshots into per-entry histories.
///
/// Snapshots must arrive in non-decreasing commit-date order; within each
/// snapshot, entries are visited in stored order.
pub fn replay(snapshots: &[Snapshot], report: &mut Report) -> Result<HistoryMap, ReplayError> {
    let mut histories = HistoryMap::new();

    for snapshot in snapshots {
        let commit_date = snapshot.commit.date;
        if commit_date == BULK_COMPLETION_DATE {
            report.info(
                Stage::Replay,
                format!(
                    "skipped commit {} ({}): retroactive bulk completion",
                    snapshot.commit.id, commit_date
                ),
            );
            continue;
        }

        for entry in &snapshot.entries {
            let status = entry
                .canonical_status()
                .map_err(|source| ReplayError::Status {
                    commit: snapshot.commit.id.clone(),
                    source,
                })?;

            match histories.get_mut(&entry.id) {
                Some(history) => history.record(status, commit_date),
                None => {
                    let seeded = first_sighting(
                        status,
                        entry.date,
                        commit_date,
                        entry.id,
                        &snapshot.commit.id,
                    )?;
                    histories.insert(entry.id, seeded);
                }
            }
        }
    }

    Ok(histories)
}

/// Seed a history for an entry's first appearance.
///
/// Every entry is assumed to have passed through the earlier lifecycle
/// states even when first observed already advanced: the implicit states
/// get the entry's own recorded date, the observed one the commit date.
fn first_sighting(
    status: Status,
    entry_date: CalDate,
    commit_date: CalDate,
    id: crate::core::EntryId,
    commit: &str,
) -> Result<History, ReplayError> {
    let seeded = if commit_date < INACTIVE_CUTOVER {
        match status {
            Status::Inactive => {
                return Err(ReplayError::InactiveBeforeCutover {
                    id,
                    commit: commit.to_owned(),
                    cutover: INACTIVE_CUTOVER,
                });
            }
            Status::NotStarted => vec![Transition::new(Status::NotStarted, entry_date)],
            advanced => vec![
                Transition::new(Status::NotStarted, entry_date),
                Transition::new(advanced, commit_date),
            ],
        }
    } else {
        let first_date = commit_date.min(entry_date);
        match status {
            Status::Inactive => vec![Transition::new(Status::Inactive, first_date)],
            Status::NotStarted => vec![
                Transition::new(Status::Inactive, entry_date),
                Transition::new(Status::NotStarted, entry_date),
            ],
            advanced => vec![
                Transition::new(Status::Inactive, entry_date),
                Transition::new(Status::NotStarted, entry_date),
                Transition::new(advanced, commit_date),
            ],
        }
    };
    Ok(History::seeded(seeded))
}
