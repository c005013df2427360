//! CSV batch scoring command

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use finsona_core::read_profile_rows;
use serde_json::json;
use tracing::warn;

use super::load_analyzer;

pub fn cmd_batch(model_dir: Option<&Path>, file: &Path, json: bool) -> Result<()> {
    let reader = File::open(file)
        .with_context(|| format!("Failed to open profile CSV {}", file.display()))?;
    let parsed = read_profile_rows(reader)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let analyzer = load_analyzer(model_dir)?;

    // A row that fails to parse and a row that fails to score are reported
    // the same way; neither stops the rest of the file.
    let mut rows = Vec::new();
    let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut failures = 0usize;
    for (row, outcome) in parsed {
        match outcome.and_then(|profile| analyzer.analyze(&profile)) {
            Ok(result) => {
                *label_counts.entry(result.label.clone()).or_default() += 1;
                rows.push((row, Ok(result)));
            }
            Err(e) => {
                warn!(row, error = %e, "row failed to score");
                failures += 1;
                rows.push((row, Err(e)));
            }
        }
    }

    if json {
        let docs: Vec<serde_json::Value> = rows
            .iter()
            .map(|(row, outcome)| match outcome {
                Ok(result) => json!({
                    "row": row,
                    "label": result.label,
                    "confidence": result.confidence(),
                    "scores": result.scores,
                }),
                Err(e) => json!({ "row": row, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    println!();
    println!("📊 Scored {} rows from {}", rows.len(), file.display());
    println!("   ─────────────────────────────────────────");
    for (row, outcome) in &rows {
        match outcome {
            Ok(result) => println!(
                "   row {:<4} {:<8} {:>5.1}%",
                row,
                result.label,
                result.confidence() * 100.0
            ),
            Err(e) => println!("   row {:<4} ❌ {}", row, e),
        }
    }
    println!();
    for (label, count) in &label_counts {
        println!("   {}: {}", label, count);
    }
    if failures > 0 {
        println!("   Failed rows: {}", failures);
    }
    println!();
    Ok(())
}
