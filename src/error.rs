use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::config::ConfigError;
use crate::core::CoreError;
use crate::git::ExtractError;
use crate::merge::MergeError;
use crate::pipeline::PipelineError;
use crate::reconcile::ReconcileError;
use crate::replay::ReplayError;

/// How much of a run an error invalidates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FailureScope {
    /// One record: drop it, log, continue the batch.
    Record,
    /// One revision: skip that snapshot, continue the batch.
    Revision,
    /// The whole run: halt, publish nothing, wait for human review.
    Run,
}

impl FailureScope {
    pub fn is_fatal(self) -> bool {
        matches!(self, FailureScope::Run)
    }
}

/// Crate-level convenience error.
///
/// Not a "god error": a thin wrapper over the per-stage error types.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl Error {
    /// Scope of the failure. Extract and merge errors carry their own
    /// scope; everything else that reaches the caller is run-fatal.
    pub fn scope(&self) -> FailureScope {
        match self {
            Error::Extract(e) => e.scope(),
            Error::Merge(e) => e.scope(),
            Error::Core(_)
            | Error::Reconcile(_)
            | Error::Replay(_)
            | Error::Artifact(_)
            | Error::Config(_)
            | Error::Pipeline(_) => FailureScope::Run,
        }
    }
}
