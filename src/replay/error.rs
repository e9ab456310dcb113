//! Replay error types. All run-fatal: a status outside the known encodings
//! or a record with no status at all would corrupt every history past it.

use thiserror::Error;

use crate::core::{CalDate, CoreError, EntryId};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReplayError {
    #[error("commit {commit}: {source}")]
    Status {
        commit: String,
        #[source]
        source: CoreError,
    },

    #[error(
        "entry {id} observed as 未生效 at commit {commit}, before the status \
         existed ({cutover})"
    )]
    InactiveBeforeCutover {
        id: EntryId,
        commit: String,
        cutover: CalDate,
    },
}
