//! CLI surface.
//!
//! Thin handlers over the pipeline: the command tree mirrors the stage
//! boundaries so partial runs (extract only, replay from a saved
//! `history.json`) stay possible.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::{Result, config};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "penh",
    version,
    about = "Penalty timeline reconstruction from tracked-file history",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: ./penalty-history.toml if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository to read (overrides config).
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Artifact output directory (overrides config).
    #[arg(long, global = true, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Debug output (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline: extract, reconcile, replay, merge.
    Run,

    /// Extract and reconcile snapshots, writing history.json.
    Extract,

    /// Replay a saved history.json into calc_history.json.
    Replay,

    /// Merge a saved history.json and its replay into latest.json.
    Merge,
}

pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::parse_from(args)
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(repo) = cli.repo {
        config.repo = repo;
    }
    if let Some(out) = cli.out {
        config.out_dir = out;
    }

    match cli.command {
        Commands::Run => commands::run(config),
        Commands::Extract => commands::extract(config),
        Commands::Replay => commands::replay(config),
        Commands::Merge => commands::merge(config),
    }
}
