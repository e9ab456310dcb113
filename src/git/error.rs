//! Extraction error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::CalDate;
use crate::error::FailureScope;

/// Errors raised while walking the tracked file's revision history.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("failed to open repository at {0}: {1}")]
    OpenRepo(PathBuf, #[source] git2::Error),

    #[error("failed to walk revisions: {0}")]
    Revwalk(#[source] git2::Error),

    #[error("invalid commit timestamp: {0}")]
    Timestamp(#[source] time::error::ComponentRange),

    #[error("tracked file not present at commit {commit}")]
    NotFound { commit: String },

    #[error("expected blob at {path} in commit {commit}")]
    NotABlob { commit: String, path: String },

    #[error("unparsable snapshot at commit {commit}: {source}")]
    Format {
        commit: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no path rule covers commit {commit} ({date})")]
    NoPathRule { commit: String, date: CalDate },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

impl ExtractError {
    /// Revision-scope errors drop that revision (the file may simply not
    /// exist yet, or a historical commit is malformed); the rest abort.
    pub fn scope(&self) -> FailureScope {
        match self {
            ExtractError::NotFound { .. }
            | ExtractError::NotABlob { .. }
            | ExtractError::Format { .. }
            | ExtractError::NoPathRule { .. } => FailureScope::Revision,

            ExtractError::OpenRepo(_, _)
            | ExtractError::Revwalk(_)
            | ExtractError::Timestamp(_)
            | ExtractError::Git(_) => FailureScope::Run,
        }
    }
}
