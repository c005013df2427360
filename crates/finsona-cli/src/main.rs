//! Finsona CLI - financial behavior classifier
//!
//! Usage:
//!   finsona predict --income 50000 --age 30 --occupation Salaried --city-tier "Tier 1"
//!   finsona predict --input profile.json --json
//!   finsona batch --file profiles.csv
//!   finsona domains
//!   finsona check

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
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

    let model_dir = cli.model_dir.as_deref();
    match cli.command {
        Commands::Predict {
            input,
            profile,
            json,
        } => commands::cmd_predict(model_dir, input.as_deref(), &profile, json),
        Commands::Batch { file, json } => commands::cmd_batch(model_dir, &file, json),
        Commands::Domains { json } => commands::cmd_domains(model_dir, json),
        Commands::Check => commands::cmd_check(model_dir),
    }
}
