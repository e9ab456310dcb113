//! Command handlers.

use crate::artifact;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::report::{Report, Severity};
use crate::Result;

fn print_report(report: &Report) {
    let warnings = report.count(Severity::Warning);
    let errors = report.count(Severity::Error);
    if warnings + errors > 0 {
        eprintln!("{warnings} warning(s), {errors} error(s); see log for details");
    }
}

pub fn run(config: Config) -> Result<()> {
    let outcome = Pipeline::new(config).run()?;
    print_report(&outcome.report);
    println!(
        "{} snapshots, {} histories, {} latest records",
        outcome.snapshots, outcome.entries, outcome.latest_records
    );
    Ok(())
}

pub fn extract(config: Config) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let mut report = Report::new();
    let snapshots = pipeline.extract(&mut report)?;
    print_report(&report);
    println!("{} snapshots written to history.json", snapshots.len());
    Ok(())
}

pub fn replay(config: Config) -> Result<()> {
    let snapshots = artifact::read_history(&config.out_dir)?;
    let pipeline = Pipeline::new(config);
    let mut report = Report::new();
    let histories = pipeline.replay(&snapshots, &mut report)?;
    print_report(&report);
    println!("{} histories written to calc_history.json", histories.len());
    Ok(())
}

pub fn merge(config: Config) -> Result<()> {
    let snapshots = artifact::read_history(&config.out_dir)?;
    let pipeline = Pipeline::new(config);
    let mut report = Report::new();
    let histories = pipeline.replay(&snapshots, &mut report)?;
    let records = pipeline.merge(&histories, &snapshots, &mut report)?;
    print_report(&report);
    println!("{} records written to latest.json", records.len());
    Ok(())
}
