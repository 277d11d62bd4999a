//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Pennywise - See where your student budget stands
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Student finance dashboard: saver, balanced, or overspender?", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analytics backend URL (overrides config and PENNYWISE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the financial figures come from
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// TOML or JSON file of field values (missing fields keep slider defaults)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override one field, e.g. --set housing=900 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

/// The non-financial form fields
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Age (16-100)
    #[arg(long)]
    pub age: u32,

    /// Gender
    #[arg(long)]
    pub gender: String,

    /// Year in school (e.g. Freshman, Junior)
    #[arg(long)]
    pub year: String,

    /// Major
    #[arg(long)]
    pub major: String,

    /// Preferred payment method (e.g. Cash, Credit/Debit Card)
    #[arg(long)]
    pub payment: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive monthly metrics and classify your budget
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Skip the backend and use built-in sample data
        #[arg(long)]
        offline: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single point (budget margin, monthly spending)
    Classify {
        /// Budget margin (income - spending)
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Monthly spending
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Use the built-in boundaries instead of the backend's
        #[arg(long)]
        offline: bool,
    },

    /// Submit your profile and compare against population averages
    Compare {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Survey CSV to use as the reference population (implies --offline)
        #[arg(long)]
        population: Option<PathBuf>,

        /// Skip the backend and use built-in sample data
        #[arg(long)]
        offline: bool,
    },

    /// Show the reference population and how the boundaries label it
    Dataset {
        /// Survey CSV to use as the reference population (implies --offline)
        #[arg(long)]
        population: Option<PathBuf>,

        /// Skip the backend and use built-in sample data
        #[arg(long)]
        offline: bool,
    },

    /// List input fields, their periods and slider ranges
    Fields,

    /// Show the effective configuration
    Config,
}
