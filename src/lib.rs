#![forbid(unsafe_code)]

pub mod artifact;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod merge;
pub mod pipeline;
pub mod reconcile;
pub mod replay;
pub mod report;
pub mod telemetry;

pub use error::{Error, FailureScope};
pub type Result<T> = std::result::Result<T, Error>;

pub use crate::core::{
    CalDate, CommitInfo, CoreError, EntryId, EntryRecord, History, HistoryMap, Snapshot, Status,
    Transition,
};
