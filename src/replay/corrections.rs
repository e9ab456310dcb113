//! Reviewed corrections applied after the automated replay pass.
//!
//! A handful of entries have replay artifacts that the snapshot record
//! alone cannot explain; their histories were reconstructed by hand from
//! stream archives and are carried here as ground truth, not re-derived.

use time::macros::date;

use crate::core::{CalDate, EntryId, History, HistoryMap, Status, Transition};
use crate::report::{Report, Stage};

/// A wholesale replacement of one entry's computed history.
#[derive(Clone, Debug)]
pub struct Correction {
    pub id: EntryId,
    pub history: History,
    pub reason: String,
}

/// The reviewed correction table.
pub fn builtin_corrections() -> Vec<Correction> {
    vec![
        Correction {
            id: EntryId::from_int(40),
            history: History::seeded(vec![
                Transition::new(Status::NotStarted, CalDate::new(date!(2024 - 07 - 20))),
                Transition::new(Status::InProgress, CalDate::new(date!(2025 - 03 - 22))),
                Transition::new(Status::Completed, CalDate::new(date!(2025 - 04 - 12))),
            ]),
            reason: "duplicate row during the 2024-11-18 renumbering left a phantom \
                     regression to 未開始; restored from stream archives"
                .to_owned(),
        },
        Correction {
            id: EntryId::from_int(81),
            history: History::seeded(vec![
                Transition::new(Status::NotStarted, CalDate::new(date!(2024 - 11 - 18))),
                Transition::new(Status::BarelyDone, CalDate::new(date!(2025 - 05 - 03))),
            ]),
            reason: "status was retyped as 已完成 and reverted within one commit; the \
                     replay recorded both flips"
                .to_owned(),
        },
    ]
}

/// Replace computed histories with their reviewed corrections.
pub fn apply_corrections(
    histories: &mut HistoryMap,
    corrections: &[Correction],
    report: &mut Report,
) {
    for correction in corrections {
        let replaced = histories
            .insert(correction.id, correction.history.clone())
            .is_some();
        report.info(
            Stage::Replay,
            format!(
                "entry {}: history {} by manual correction ({})",
                correction.id,
                if replaced { "replaced" } else { "inserted" },
                correction.reason
            ),
        );
    }
}

/// Drop the reserved structurally invalid identifier, whatever the
/// automated pass produced for it.
pub fn remove_reserved(histories: &mut HistoryMap, report: &mut Report) {
    if histories.remove(&EntryId::RESERVED_INVALID).is_some() {
        report.info(
            Stage::Replay,
            format!(
                "removed reserved invalid entry {} from the history map",
                EntryId::RESERVED_INVALID
            ),
        );
    }
}
