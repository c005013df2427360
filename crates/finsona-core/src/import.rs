//! CSV import for batch profile scoring
//!
//! Reads the canonical profile CSV: one header row, one profile per data
//! row, `hobbies` pipe-separated (`Reading|Travel`). Columns are matched by
//! header name, not position, so exports with reordered columns still load.
//! Errors name the offending row and field.
//!
//! Two readers share the parsing: `read_profile_rows` tags every data row
//! with its outcome so batch surfaces can report bad rows and keep going,
//! and `read_profiles_csv` is the strict all-or-nothing wrapper.

use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Profile;

const REQUIRED_COLUMNS: [&str; 9] = [
    "monthly_income",
    "age",
    "occupation",
    "city_tier",
    "loan_repayment",
    "fixed_expenses",
    "investments",
    "savings",
    "outing_frequency",
];

/// `hobbies` column is optional; a missing column means no hobbies.
const HOBBIES_COLUMN: &str = "hobbies";

fn field<'r>(
    record: &'r StringRecord,
    positions: &HashMap<String, usize>,
    row: usize,
    name: &str,
) -> Result<&'r str> {
    positions
        .get(name)
        .and_then(|pos| record.get(*pos))
        .ok_or_else(|| Error::InvalidData(format!("row {}: missing '{}'", row, name)))
}

fn parse_money(value: &str, row: usize, name: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        Error::InvalidData(format!(
            "row {}: '{}' is not a valid amount for '{}'",
            row, value, name
        ))
    })
}

fn parse_count(value: &str, row: usize, name: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::InvalidData(format!(
            "row {}: '{}' is not a valid count for '{}'",
            row, value, name
        ))
    })
}

fn parse_hobbies(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_record(
    record: &StringRecord,
    positions: &HashMap<String, usize>,
    row: usize,
) -> Result<Profile> {
    let hobbies = positions
        .get(HOBBIES_COLUMN)
        .and_then(|pos| record.get(*pos))
        .map(parse_hobbies)
        .unwrap_or_default();

    Ok(Profile {
        monthly_income: parse_money(
            field(record, positions, row, "monthly_income")?,
            row,
            "monthly_income",
        )?,
        age: parse_count(field(record, positions, row, "age")?, row, "age")?,
        occupation: field(record, positions, row, "occupation")?.trim().to_string(),
        city_tier: field(record, positions, row, "city_tier")?.trim().to_string(),
        loan_repayment: parse_money(
            field(record, positions, row, "loan_repayment")?,
            row,
            "loan_repayment",
        )?,
        fixed_expenses: parse_money(
            field(record, positions, row, "fixed_expenses")?,
            row,
            "fixed_expenses",
        )?,
        investments: parse_money(
            field(record, positions, row, "investments")?,
            row,
            "investments",
        )?,
        savings: parse_money(field(record, positions, row, "savings")?, row, "savings")?,
        outing_frequency: parse_count(
            field(record, positions, row, "outing_frequency")?,
            row,
            "outing_frequency",
        )?,
        hobbies,
    })
}

/// Parse a profile CSV row by row, tagging each data row with its outcome.
///
/// A header-level problem (unreadable input, missing required column) fails
/// the whole read. A bad data row yields an error for that row only and
/// parsing continues, so one malformed amount never hides the rest of the
/// file. Row 1 is the header; data rows are numbered from 2. Profiles are
/// returned unvalidated; the analyzer validates at scoring time.
pub fn read_profile_rows<R: Read>(reader: R) -> Result<Vec<(usize, Result<Profile>)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let positions: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(pos, name)| (name.to_string(), pos))
        .collect();
    for required in REQUIRED_COLUMNS {
        if !positions.contains_key(required) {
            return Err(Error::InvalidData(format!(
                "missing required column '{}'",
                required
            )));
        }
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 2;
        let outcome = result
            .map_err(Error::from)
            .and_then(|record| parse_record(&record, &positions, row));
        rows.push((row, outcome));
    }

    debug!(rows = rows.len(), "parsed profile CSV");
    Ok(rows)
}

/// Parse a profile CSV into profiles, failing on the first bad row.
///
/// Strict wrapper over `read_profile_rows` for callers that want a clean
/// dataset or nothing.
pub fn read_profiles_csv<R: Read>(reader: R) -> Result<Vec<Profile>> {
    let mut profiles = Vec::new();
    for (_, outcome) in read_profile_rows(reader)? {
        profiles.push(outcome?);
    }
    Ok(profiles)
}
