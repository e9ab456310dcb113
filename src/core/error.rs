//! Core domain errors.

use thiserror::Error;

use super::id::EntryId;

/// Errors raised by the domain types themselves.
///
/// All of these are run-scope: an unknown status or a record without any
/// status representation means the curated tables are stale, and silently
/// defaulting would corrupt history semantics.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    #[error("unknown status label {0:?}")]
    UnknownStatusLabel(String),

    #[error("unknown done code {0}")]
    UnknownDoneCode(u64),

    #[error("entry {id} carries neither a `status` nor a `done` field")]
    MissingStatus { id: EntryId },

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    DateFormat(String),

    #[error("entry id {0} is not representable: only integers and tenths decimals occur")]
    IdPrecision(f64),

    #[error("unparsable entry id {0:?}")]
    IdParse(String),
}
