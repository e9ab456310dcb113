//! Reconciliation error types.
//!
//! Everything here is run-fatal: a failed name check or a stale override
//! means the curated event table no longer matches reality and a human has
//! to review it before any output can be trusted. Per-record lookup
//! failures during apply are diagnostics, not errors.

use thiserror::Error;

use crate::core::{CalDate, EntryId};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error("renumbering event {date}: no snapshot for commit {commit}")]
    MissingEventCommit { date: CalDate, commit: String },

    #[error(
        "renumbering event {date}: positional pairing needs equal counts, \
         got {old_len} old vs {new_len} new entries"
    )]
    CountMismatch {
        date: CalDate,
        old_len: usize,
        new_len: usize,
    },

    #[error(
        "name mismatch for entry {id}: {observed:?} does not normalize to \
         {canonical:?} and no exception is declared"
    )]
    NameMismatch {
        id: EntryId,
        observed: String,
        canonical: String,
    },

    #[error("manual override references old id {0}, which the derived mapping lacks")]
    BadOverride(EntryId),

    #[error("renumbering events must be applied in chronological order ({earlier} after {later})")]
    EventsOutOfOrder { earlier: CalDate, later: CalDate },
}
