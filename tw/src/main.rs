//! TripWeaver - personalized multi-day trip planner
//!
//! CLI entry point for running the planning pipeline and inspecting stored
//! preferences.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use prefstore::{PreferenceStore, SqliteStore};
use tripweaver::cli::{Cli, Command};
use tripweaver::config::Config;
use tripweaver::domain::TripRequest;
use tripweaver::pipeline::Planner;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripweaver")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout - stdout is for plan output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("tripweaver.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "TripWeaver loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Plan {
            source,
            destination,
            start_date,
            end_date,
            preferences,
            hobbies,
            user_id,
            output,
        } => {
            let request = TripRequest {
                user_id,
                source,
                destination,
                start_date,
                end_date,
                preferences,
                hobbies,
            };
            cmd_plan(&config, request, output, cli.verbose).await
        }
        Command::Prefs { user_id } => cmd_prefs(&config, &user_id),
    }
}

/// Run the planning pipeline for one trip request
async fn cmd_plan(config: &Config, request: TripRequest, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    config.validate()?;

    let planner = Planner::from_config(config).context("Failed to construct planner")?;

    println!(
        "Planning trip from {} to {} ({} to {})...",
        request.source, request.destination, request.start_date, request.end_date
    );

    let outcome = match planner.run(request).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            eprintln!("{} plan failed at {}: {}", "error:".red().bold(), failure.stage, failure.error);
            if verbose {
                // Partial progress for observability
                let partial = serde_json::to_string_pretty(&failure.state)?;
                eprintln!("Partial state:\n{}", partial);
            }
            return Err(eyre::eyre!("plan failed at {}: {}", failure.stage, failure.error));
        }
    };

    if let Some(warning) = &outcome.save_warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let state = outcome.state;

    match output {
        Some(path) => {
            fs::write(&path, &state.final_plan).context(format!("Failed to write plan to {}", path.display()))?;
            println!("Final plan written to {}", path.display());
        }
        None => {
            print_section("DESTINATION RESEARCH", &state.destination_info);
            print_section("DAILY ITINERARY", &state.itinerary);
            print_section("ACCOMMODATIONS", &state.accommodations);
            print_section("RECOMMENDED ACTIVITIES", &state.activities);
            print_section("FINAL TRAVEL PLAN", &state.final_plan);
        }
    }

    Ok(())
}

/// Show the stored preference record for a user
fn cmd_prefs(config: &Config, user_id: &str) -> Result<()> {
    let store = SqliteStore::open(&config.storage.prefstore_dir).context("Failed to open preference store")?;

    match store.load(user_id)? {
        Some(record) => {
            println!("{}", "Saved preferences".bold());
            println!("  User:        {}", record.user_id);
            println!("  Preferences: {}", record.preferences);
            println!("  Hobbies:     {}", record.hobbies);
            println!("  Updated:     {}", record.updated_at);
        }
        None => {
            println!("No saved preferences for {}", user_id);
        }
    }

    Ok(())
}

fn print_section(title: &str, body: &str) {
    println!();
    println!("{}", format!("=== {} ===", title).cyan().bold());
    println!("{}", body);
}
