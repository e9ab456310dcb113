//! Entry records as stored in the tracked file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::date::CalDate;
use super::error::CoreError;
use super::id::EntryId;
use super::status::Status;

/// One entry as it appeared in the tracked file at some revision.
///
/// The status arrives in one of two raw encodings depending on the era of
/// the file: a `status` label string (current) or a small `done` code
/// (early). Both are kept raw here; normalization happens during replay so
/// that an unrecognized value is a run-level failure, not a skipped
/// revision. Fields the pipeline does not interpret (descriptions, links)
/// flow through `extra` untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub name: String,
    pub date: CalDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EntryRecord {
    /// Normalize whichever raw encoding this record carries.
    ///
    /// A `status` label wins when both are present, matching the order the
    /// encodings were introduced in. A record with neither is malformed.
    pub fn canonical_status(&self) -> Result<Status, CoreError> {
        if let Some(label) = &self.status {
            return Status::from_label(label);
        }
        if let Some(code) = self.done {
            return Status::from_done_code(code);
        }
        Err(CoreError::MissingStatus { id: self.id })
    }
}
