//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TripWeaver - personalized multi-day trip planner
#[derive(Parser)]
#[command(
    name = "tripweaver",
    about = "Personalized multi-day trip planning pipeline",
    version,
    after_help = "Logs are written to: ~/.local/share/tripweaver/logs/tripweaver.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Plan a trip
    Plan {
        /// Starting location
        #[arg(long)]
        source: String,

        /// Destination location
        #[arg(long)]
        destination: String,

        /// Trip start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Trip end date (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,

        /// Preferences (budget level, travel style)
        #[arg(long, default_value = "")]
        preferences: String,

        /// Hobbies and interests
        #[arg(long, default_value = "")]
        hobbies: String,

        /// User identifier; enables preference persistence across sessions
        #[arg(long)]
        user_id: Option<String>,

        /// Write the final plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the stored preference record for a user
    Prefs {
        /// User identifier
        #[arg(long)]
        user_id: String,
    },
}
