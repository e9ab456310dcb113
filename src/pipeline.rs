//! Pipeline orchestration.
//!
//! One strictly sequential batch: extract → reconcile passes → replay →
//! merge. Every stage is all-or-nothing; a fatal error publishes nothing
//! for that stage and the run is simply restarted after review. Snapshots
//! move by value from stage to stage, so at most two generations of the
//! set are alive at once.

use thiserror::Error;

use crate::config::Config;
use crate::core::{HistoryMap, Snapshot};
use crate::merge::{LatestRecord, merge_latest};
use crate::reconcile::{self, RenumberingEvent};
use crate::replay::{self, Correction};
use crate::report::Report;
use crate::{Result, artifact, git};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("no snapshots could be extracted from the tracked file's history")]
    NoSnapshots,
}

/// What a full run produced, with its diagnostic stream.
#[derive(Debug)]
pub struct RunOutcome {
    pub snapshots: usize,
    pub entries: usize,
    pub latest_records: usize,
    pub report: Report,
}

/// The full pipeline with its curated fact tables.
pub struct Pipeline {
    config: Config,
    events: Vec<RenumberingEvent>,
    corrections: Vec<Correction>,
}

impl Pipeline {
    /// Pipeline over the reviewed builtin fact tables.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            events: reconcile::builtin_events(),
            corrections: replay::builtin_corrections(),
        }
    }

    /// Replace the renumbering event table (tests, alternate checkouts).
    pub fn with_events(mut self, events: Vec<RenumberingEvent>) -> Self {
        self.events = events;
        self
    }

    /// Replace the manual correction table.
    pub fn with_corrections(mut self, corrections: Vec<Correction>) -> Self {
        self.corrections = corrections;
        self
    }

    /// Extract and reconcile, publishing `history.json`.
    pub fn extract(&self, report: &mut Report) -> Result<Vec<Snapshot>> {
        let raw = git::extract_snapshots(&self.config.repo, &self.config.path_rules, report)?;
        if raw.is_empty() {
            return Err(PipelineError::NoSnapshots.into());
        }
        let reconciled = reconcile::reconcile(raw, &self.events, report)?;
        artifact::write_history(&self.config.out_dir, &reconciled)?;
        Ok(reconciled)
    }

    /// Replay reconciled snapshots, publishing `calc_history.json`.
    pub fn replay(&self, snapshots: &[Snapshot], report: &mut Report) -> Result<HistoryMap> {
        let mut histories = replay::replay(snapshots, report)?;
        replay::apply_corrections(&mut histories, &self.corrections, report);
        replay::remove_reserved(&mut histories, report);
        artifact::write_calc_history(&self.config.out_dir, &histories)?;
        Ok(histories)
    }

    /// Merge the latest snapshot with its histories, publishing
    /// `latest.json`.
    pub fn merge(
        &self,
        histories: &HistoryMap,
        snapshots: &[Snapshot],
        report: &mut Report,
    ) -> Result<Vec<LatestRecord>> {
        let latest = snapshots.last().ok_or(PipelineError::NoSnapshots)?;
        let records = merge_latest(histories, latest, report);
        artifact::write_latest(&self.config.out_dir, &records)?;
        Ok(records)
    }

    /// The whole batch, end to end.
    pub fn run(&self) -> Result<RunOutcome> {
        let mut report = Report::new();

        let snapshots = self.extract(&mut report)?;
        let histories = self.replay(&snapshots, &mut report)?;
        let records = self.merge(&histories, &snapshots, &mut report)?;

        tracing::info!(
            snapshots = snapshots.len(),
            histories = histories.len(),
            latest = records.len(),
            "pipeline complete"
        );
        Ok(RunOutcome {
            snapshots: snapshots.len(),
            entries: histories.len(),
            latest_records: records.len(),
            report,
        })
    }
}
