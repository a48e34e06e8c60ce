//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Zero-config coding-activity tracker.
///
/// Editors report lightweight edit events; `tempo` persists them and turns
/// them into multi-period statistics, streaks and achievements on demand.
#[derive(Debug, Parser)]
#[command(name = "tempo", version, about, long_about = None)]
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
    /// Track a file activity.
    Track(TrackArgs),

    /// Show statistics.
    Stats {
        /// Show only today's stats.
        #[arg(long)]
        today: bool,
    },

    /// Show today's activity.
    Today,

    /// Show project breakdown.
    Projects,

    /// Output the full report as JSON for external tools.
    Api(ApiArgs),

    /// Optimize the database (run monthly).
    Optimize,

    /// Rebuild the daily summary tables from the event log.
    RebuildSummaries,

    /// Show database information.
    Info,
}

/// Arguments for `tempo track`.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// File path being edited.
    #[arg(long)]
    pub file: String,

    /// Language; detected from the file extension when omitted.
    #[arg(long)]
    pub lang: Option<String>,

    /// Project; detected from the enclosing git repository when omitted.
    #[arg(long)]
    pub project: Option<String>,

    /// Editor name (e.g. neovim, vscode).
    #[arg(long)]
    pub editor: Option<String>,

    /// Lines changed in this edit tick.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub lines: i64,

    /// Git branch, if known.
    #[arg(long)]
    pub branch: Option<String>,

    /// Mark this tick as a read, not a write.
    #[arg(long)]
    pub read_only: bool,
}

/// Arguments for `tempo api`.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Output compact JSON (no indentation).
    #[arg(long)]
    pub compact: bool,

    /// Load activities from the last N days.
    #[arg(long)]
    pub days: Option<i64>,
}
