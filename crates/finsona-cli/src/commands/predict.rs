//! Single-profile prediction command

use std::path::Path;

use anyhow::{bail, Context, Result};
use finsona_core::{PredictionResult, Profile};
use serde_json::json;

use crate::cli::ProfileFlags;

use super::load_analyzer;

/// Build a profile from the CLI flags.
///
/// Requiredness is enforced by clap, but the flags arrive as options, so
/// missing values are still reported cleanly instead of panicking.
pub fn profile_from_flags(flags: &ProfileFlags) -> Result<Profile> {
    let Some(monthly_income) = flags.income else {
        bail!("--income is required without --input");
    };
    let Some(age) = flags.age else {
        bail!("--age is required without --input");
    };
    let Some(occupation) = flags.occupation.clone() else {
        bail!("--occupation is required without --input");
    };
    let Some(city_tier) = flags.city_tier.clone() else {
        bail!("--city-tier is required without --input");
    };
    Ok(Profile {
        monthly_income,
        age,
        occupation,
        city_tier,
        loan_repayment: flags.loan,
        fixed_expenses: flags.fixed,
        investments: flags.investments,
        savings: flags.savings,
        outing_frequency: flags.outings,
        hobbies: flags.hobby.clone(),
    })
}

fn read_profile_file(path: &Path) -> Result<Profile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid profile JSON", path.display()))
}

pub fn cmd_predict(
    model_dir: Option<&Path>,
    input: Option<&Path>,
    flags: &ProfileFlags,
    json: bool,
) -> Result<()> {
    let profile = match input {
        Some(path) => read_profile_file(path)?,
        None => profile_from_flags(flags)?,
    };

    let analyzer = load_analyzer(model_dir)?;
    let result = analyzer.analyze(&profile)?;

    if json {
        print_json(&profile, &result)?;
    } else {
        print_summary(&profile, &result);
    }
    Ok(())
}

fn print_json(profile: &Profile, result: &PredictionResult) -> Result<()> {
    let doc = json!({
        "label": result.label,
        "confidence": result.confidence(),
        "scores": result.scores,
        "indicators": profile.indicators(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn print_summary(profile: &Profile, result: &PredictionResult) {
    let indicators = profile.indicators();

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Finsona Prediction          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Behavior: {}  ({:.1}% confidence)",
        result.label,
        result.confidence() * 100.0
    );
    println!();
    println!("  Class probabilities:");
    for score in result.ranked() {
        println!(
            "    {:<8} {:>5.1}%  {}",
            score.label,
            score.probability * 100.0,
            bar(score.probability)
        );
    }
    println!();
    println!("  Financial ratios (of income):");
    println!("    Savings:        {:>5.1}%", indicators.savings_ratio * 100.0);
    println!(
        "    Investments:    {:>5.1}%",
        indicators.investment_ratio * 100.0
    );
    println!(
        "    Fixed expenses: {:>5.1}%",
        indicators.fixed_expense_ratio * 100.0
    );
    println!();
}

/// 20-slot probability bar for the summary view.
fn bar(probability: f64) -> String {
    let filled = (probability.clamp(0.0, 1.0) * 20.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}
