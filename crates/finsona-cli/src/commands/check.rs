//! Artifact health check command

use std::path::Path;

use anyhow::{Context, Result};
use finsona_core::schema;

use super::load_analyzer;

/// Load the artifacts and run the self-check.
///
/// Exits nonzero (via the returned error) when the artifact set is
/// unusable, so deployments can verify health with `finsona check`.
pub fn cmd_check(model_dir: Option<&Path>) -> Result<()> {
    println!();
    println!("🔬 Finsona artifact check");
    println!("   ─────────────────────────────────────────");
    match model_dir {
        Some(dir) => println!("   Artifacts: {}", dir.display()),
        None => println!("   Artifacts: bundled"),
    }
    println!("   Schema: v{} ({} columns)", schema::SCHEMA_VERSION, schema::FEATURE_COUNT);

    let analyzer = load_analyzer(model_dir)?;
    // load_analyzer already self-checked; run it again so this command
    // reports the full verdict even if loading gets laxer one day.
    analyzer
        .bundle()
        .self_check()
        .context("Artifact self-check failed")?;

    let forest = analyzer.bundle().forest();
    println!("   Forest: {} trees over {} classes", forest.tree_count(), forest.n_classes());
    println!("   Classes: {}", analyzer.class_labels().join(", "));
    println!();
    println!("   ✅ Healthy");
    println!();
    Ok(())
}
