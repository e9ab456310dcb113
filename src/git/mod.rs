//! Snapshot extraction from the tracked repository.
//!
//! Provides:
//! - Path relocation rules for the tracked file
//! - Revision enumeration (oldest first) for the tracked path chain
//! - Blob retrieval + JSON parsing into `Snapshot`s

pub mod error;
pub mod extract;
pub mod paths;

pub use error::ExtractError;
pub use extract::{extract_snapshots, snapshot_at, tracked_commits};
pub use paths::{PathRule, default_path_rules};
