//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Finsona - classify financial behavior from a profile
#[derive(Parser)]
#[command(name = "finsona")]
#[command(about = "Financial behavior classifier (Saver / Spender / Neutral)", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory with fitted model artifacts (defaults to the bundled set)
    #[arg(long, global = true, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify one profile
    Predict {
        /// JSON file with the profile (profile flags are ignored)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        profile: ProfileFlags,

        /// Print machine-readable JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Score every profile in a CSV file
    Batch {
        /// Profile CSV (header row; hobbies pipe-separated)
        #[arg(short, long)]
        file: PathBuf,

        /// Print machine-readable JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// List the fitted vocabularies (occupations, city tiers, classes, hobbies)
    Domains {
        /// Print machine-readable JSON instead of the listing
        #[arg(long)]
        json: bool,
    },

    /// Load the artifacts and run the startup self-check
    Check,
}

/// Profile fields as flags, for `predict` without an input file.
#[derive(Args)]
pub struct ProfileFlags {
    /// Monthly income
    #[arg(long, required_unless_present = "input")]
    pub income: Option<f64>,

    /// Age in years
    #[arg(long, required_unless_present = "input")]
    pub age: Option<u32>,

    /// Occupation (see `finsona domains`)
    #[arg(long, required_unless_present = "input")]
    pub occupation: Option<String>,

    /// City tier (see `finsona domains`)
    #[arg(long, required_unless_present = "input")]
    pub city_tier: Option<String>,

    /// Monthly loan repayment
    #[arg(long, default_value_t = 0.0)]
    pub loan: f64,

    /// Monthly fixed expenses
    #[arg(long, default_value_t = 0.0)]
    pub fixed: f64,

    /// Monthly investments
    #[arg(long, default_value_t = 0.0)]
    pub investments: f64,

    /// Monthly savings
    #[arg(long, default_value_t = 0.0)]
    pub savings: f64,

    /// Discretionary outings per month
    #[arg(long, default_value_t = 0)]
    pub outings: u32,

    /// Hobby from the fixed vocabulary (repeatable)
    #[arg(long = "hobby", value_name = "HOBBY")]
    pub hobby: Vec<String>,
}
