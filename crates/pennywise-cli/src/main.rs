//! Pennywise CLI - Student finance dashboard
//!
//! Usage:
//!   pennywise analyze --set housing=900     Classify your budget
//!   pennywise compare --age 20 ...          Compare with other students
//!   pennywise dataset                       Inspect the reference population
//!   pennywise fields                        List input fields

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.backend_url.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            offline,
            json,
        } => commands::cmd_analyze(&config, &input, offline, json).await,
        Commands::Classify { x, y, offline } => {
            commands::cmd_classify(&config, x, y, offline).await
        }
        Commands::Compare {
            profile,
            input,
            population,
            offline,
        } => {
            commands::cmd_compare(&config, &profile, &input, population.as_deref(), offline).await
        }
        Commands::Dataset {
            population,
            offline,
        } => commands::cmd_dataset(&config, population.as_deref(), offline).await,
        Commands::Fields => commands::cmd_fields(),
        Commands::Config => commands::cmd_config(&config),
    }
}
