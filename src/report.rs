//! Structured run diagnostics.
//!
//! Per-record and per-revision incidents must not abort the batch, but the
//! caller still has to see them to judge whether the curated tables need
//! attention. Each pass pushes `Diagnostic`s into a shared `Report`;
//! every push is mirrored to `tracing` at the matching level.

use std::fmt;

/// Severity of one diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected events worth an audit trail (new entries during name-keyed
    /// pairing, skipped known-bad commits).
    Info,
    /// Tolerated anomalies (dropped records, skipped revisions).
    Warning,
    /// Anomalies that made it into the output in degraded form.
    Error,
}

/// Pipeline stage a diagnostic originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Reconcile,
    Replay,
    Merge,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Reconcile => "reconcile",
            Stage::Replay => "replay",
            Stage::Merge => "merge",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
}

/// Diagnostics collected over one run.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Info, stage, message.into());
    }

    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Warning, stage, message.into());
    }

    pub fn error(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Error, stage, message.into());
    }

    fn push(&mut self, severity: Severity, stage: Stage, message: String) {
        match severity {
            Severity::Info => tracing::info!(stage = stage.as_str(), "{message}"),
            Severity::Warning => tracing::warn!(stage = stage.as_str(), "{message}"),
            Severity::Error => tracing::error!(stage = stage.as_str(), "{message}"),
        }
        self.diagnostics.push(Diagnostic {
            severity,
            stage,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.diagnostics.iter().map(|d| d.severity).max()
    }

    pub fn has_warnings(&self) -> bool {
        self.worst() >= Some(Severity::Warning)
    }
}
