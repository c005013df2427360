//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `predict` - Single-profile classification (flags or JSON input)
//! - `batch` - CSV batch scoring
//! - `domains` - Fitted vocabulary listing
//! - `check` - Artifact load and self-check

pub mod batch;
pub mod check;
pub mod domains;
pub mod predict;

use std::path::Path;

use anyhow::{Context, Result};
use finsona_core::Analyzer;

// Re-export command functions for main.rs
pub use batch::*;
pub use check::*;
pub use domains::*;
pub use predict::*;

/// Load an analyzer from `--model-dir`, or the bundled artifacts without it.
pub fn load_analyzer(model_dir: Option<&Path>) -> Result<Analyzer> {
    match model_dir {
        Some(dir) => Analyzer::from_dir(dir)
            .with_context(|| format!("Failed to load model artifacts from {}", dir.display())),
        None => Analyzer::bundled().context("Failed to load bundled model artifacts"),
    }
}
