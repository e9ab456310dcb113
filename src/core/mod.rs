//! Core domain types, in dependency order:
//! - date: calendar dates (Layer 0)
//! - id: entry identifiers (Layer 0)
//! - status: the canonical status set and raw encodings (Layer 1)
//! - record: entry records as stored in the tracked file (Layer 2)
//! - snapshot: per-revision entry lists (Layer 3)
//! - history: per-entry transition logs (Layer 3)

pub mod date;
pub mod error;
pub mod history;
pub mod id;
pub mod record;
pub mod snapshot;
pub mod status;

pub use date::CalDate;
pub use error::CoreError;
pub use history::{History, HistoryMap, Transition};
pub use id::EntryId;
pub use record::EntryRecord;
pub use snapshot::{CommitInfo, Snapshot};
pub use status::Status;
