//! Fitted vocabulary listing command

use std::path::Path;

use anyhow::Result;
use finsona_core::{schema, CategoricalField};
use serde_json::json;

use super::load_analyzer;

pub fn cmd_domains(model_dir: Option<&Path>, json: bool) -> Result<()> {
    let analyzer = load_analyzer(model_dir)?;
    let occupations = analyzer.domain(CategoricalField::Occupation);
    let city_tiers = analyzer.domain(CategoricalField::CityTier);
    let classes = analyzer.class_labels();

    if json {
        let doc = json!({
            "occupations": occupations,
            "city_tiers": city_tiers,
            "classes": classes,
            "hobbies": schema::HOBBIES,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!();
    println!("📋 Fitted vocabularies");
    println!("   ─────────────────────────────────────────");
    print_section("Occupations", occupations.iter().map(String::as_str));
    print_section("City tiers", city_tiers.iter().map(String::as_str));
    print_section("Classes", classes.iter().map(String::as_str));
    print_section("Hobbies", schema::HOBBIES.iter().copied());
    println!();
    Ok(())
}

fn print_section<'a>(title: &str, entries: impl Iterator<Item = &'a str>) {
    println!();
    println!("   {}:", title);
    for entry in entries {
        println!("     - {}", entry);
    }
}
