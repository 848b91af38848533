use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Operator tooling for the snapshot export trigger.
#[derive(Parser, Debug)]
#[command(name = "snapex", version, about = "Operator tooling for the snapshot export trigger")]
pub struct CliArgs {
    /// Config profile (overrides SNAPEX_PROFILE).
    #[arg(long, env = "SNAPEX_PROFILE", default_value = "", global = true)]
    pub profile: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the event bus rule pattern admitting export-ready snapshots.
    Pattern {
        /// Single-line output (as expected by most provisioning tools).
        #[arg(long)]
        compact: bool,
    },

    /// Print the export job identifier for a snapshot ARN.
    JobId {
        /// Snapshot resource reference.
        arn: String,
    },

    /// Print the effective configuration, without secrets.
    Config,

    /// Run the trigger once for an event JSON file.
    Invoke {
        /// Path to the event JSON (`-` for stdin).
        #[arg(long)]
        event: PathBuf,

        /// Print the export request instead of calling the export service.
        #[arg(long)]
        dry_run: bool,

        /// Partition date override, YYYY-MM-DD (dry runs only).
        #[arg(long, requires = "dry_run")]
        date: Option<NaiveDate>,

        /// Hand the event to the trigger even if the filter would drop it.
        #[arg(long)]
        skip_filter: bool,
    },
}
