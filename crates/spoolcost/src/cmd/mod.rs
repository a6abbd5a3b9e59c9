//! Command implementations for the `spoolcost` binary.
//!
//! [`main`] parses the command line and dispatches to one of the modes:
//! interactive accounting (default), snapshot capture or snapshot comparison.

pub mod account;
pub mod compare;
pub mod completions;
pub mod snapshot_cmd;

use crate::catalog::SpoolmanClient;
use crate::cmd::completions::ShellType;
use crate::config::{Config, ConfigArgs};
use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Output format for comparison reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Track what each 3D print costs in filament.
#[derive(Parser, Debug)]
#[command(name = "spoolcost", author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Save a snapshot of the current spool inventory and exit
    #[arg(long, conflicts_with = "compare")]
    pub snapshot: bool,

    /// Compare two snapshot files and report the filament used between them
    #[arg(long, num_args = 2, value_names = ["SNAPSHOT1", "SNAPSHOT2"])]
    pub compare: Option<Vec<PathBuf>>,

    /// Also list spools whose weight did not change
    #[arg(long)]
    pub show_unchanged: bool,

    /// Output format for comparisons (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show debug output on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Main entry point.
pub fn main() -> ExitCode {
    main_with_name("spoolcost")
}

/// Main entry point with a custom binary name for completions.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    // Environment from .env must be in place before clap reads it
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env file: {e}"),
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run the mode selected by `args`.
pub fn run(args: Args) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if let Some(paths) = &args.compare {
        let [baseline, later] = paths.as_slice() else {
            bail!("--compare takes exactly two snapshot files");
        };
        compare::run(baseline, later, args.show_unchanged, args.format, &mut stdout)?;
        return Ok(());
    }

    let config = Config::from(args.config);
    tracing::debug!(api_url = %config.api_url, timeout = ?config.timeout, "configuration resolved");
    let client = SpoolmanClient::new(&config);

    if args.snapshot {
        let now = Local::now().naive_local();
        snapshot_cmd::run(&client, &config.output_dir, now, &mut stdout)?;
        return Ok(());
    }

    account::run(&client, &mut stdout)
}
