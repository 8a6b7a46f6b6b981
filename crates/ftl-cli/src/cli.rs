//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

use ftl_core::NewSector;

use crate::commands::util::{parse_at, parse_sector};

/// Flight and duty time limitation tracker.
///
/// Records techlog entries and checks pilots against the rolling flight time,
/// duty time, sector and rest limits.
#[derive(Debug, Parser)]
#[command(name = "ftl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a techlog entry.
    Add(AddArgs),

    /// Import entries from a JSON file (`-` reads stdin).
    Import {
        /// File holding a JSON array of entries.
        path: PathBuf,
    },

    /// Write every stored entry to stdout as JSON.
    Export,

    /// Show window totals and limit status for a pilot.
    Pilot(EvaluateArgs),

    /// List a pilot's flying days, newest first.
    Duty {
        /// Pilot or co-pilot name, as recorded.
        name: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show rest periods between a pilot's duty days.
    Rest(EvaluateArgs),

    /// Show the stored cycle and hour rollup for an aircraft.
    Aircraft {
        /// Aircraft registration.
        registration: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show limit status for every pilot on record.
    Fleet {
        /// Evaluate as of this local time instead of now.
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry by ID.
    Delete {
        /// Entry ID.
        id: String,
    },

    /// Rebuild every aircraft rollup from the stored entries.
    Recompute,

    /// Show database location and record counts.
    Status,
}

/// Fields of a new techlog entry.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Techlog page number.
    #[arg(long)]
    pub techlog: String,

    /// Flight date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Aircraft registration.
    #[arg(long)]
    pub aircraft: String,

    /// Pilot in command.
    #[arg(long)]
    pub pilot: String,

    /// Co-pilot, if any.
    #[arg(long)]
    pub co_pilot: Option<String>,

    /// A sector as DEP,ARR,TAKEOFF,LANDING (e.g. HTDA,HTKJ,07:00,07:55).
    /// Repeat for each sector flown.
    #[arg(long = "sector", required = true, value_parser = parse_sector)]
    pub sectors: Vec<NewSector>,
}

/// Arguments shared by the per-pilot evaluations.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Pilot or co-pilot name, as recorded.
    pub name: String,

    /// Evaluate as of this local time instead of now.
    #[arg(long, value_parser = parse_at)]
    pub at: Option<NaiveDateTime>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
