//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// deadlinesync - Canvas deadlines and syllabus exam dates in your calendar
#[derive(Debug, Parser)]
#[command(name = "deadlinesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DEADLINESYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by the commands that read Canvas.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CollectArgs {
    /// Also scan syllabus pages and schedule PDFs for exam dates
    #[arg(long)]
    pub syllabus: bool,

    /// Only these course ids (can be repeated)
    #[arg(long = "course-id", action = clap::ArgAction::Append)]
    pub course_ids: Vec<u64>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract exam dates from a local PDF, HTML or text file
    ScanFile {
        /// The document to scan
        path: PathBuf,

        /// Course name attached to the candidates
        #[arg(long, default_value = "Course")]
        course: String,

        /// Keep repeated matches from overlapping windows
        #[arg(long)]
        raw: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List active Canvas courses
    Courses {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List assignments, calendar events and (optionally) syllabus exam dates
    Deadlines {
        #[command(flatten)]
        collect: CollectArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Write deadlines to a calendar
    Sync {
        #[command(flatten)]
        collect: CollectArgs,

        /// Write to this .ics file instead of the configured one
        #[arg(long)]
        ics: Option<PathBuf>,

        /// Compute the changes without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
