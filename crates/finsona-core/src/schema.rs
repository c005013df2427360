//! Feature schema for the behavior classifier
//!
//! The classifier consumes a fixed-width numeric vector. Column identity is
//! positional: the fitted artifacts and this module must agree on the exact
//! column list and order, or predictions are garbage. Every artifact records
//! the schema version and column list it was fitted against, and the loader
//! cross-checks both against these constants before the first prediction.

/// Version stamp shared by this module and every fitted artifact.
///
/// Bump whenever a column is added, removed, or reordered. Artifacts fitted
/// against a different version are rejected at load time.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of columns in the full feature vector.
pub const FEATURE_COUNT: usize = 22;

/// Number of standard-scaled numeric columns.
pub const NUMERIC_FEATURE_COUNT: usize = 7;

/// Number of hobby indicator columns.
pub const HOBBY_COUNT: usize = 13;

/// Hobby vocabulary, in column order. Each entry owns one indicator column.
pub const HOBBIES: [&str; HOBBY_COUNT] = [
    "Baking",
    "Cooking",
    "Electronics",
    "Fitness",
    "Gaming",
    "Gardening",
    "Photography",
    "Reading",
    "Social Media",
    "Sports",
    "Travel",
    "Video Games",
    "Writing",
];

/// Columns fed through the standard scaler, in scaler input order.
///
/// The two ordinal columns (occupation, city_tier) are deliberately absent:
/// label codes pass through unscaled.
pub const NUMERIC_COLUMNS: [&str; NUMERIC_FEATURE_COUNT] = [
    "monthly_income",
    "age",
    "loan_repayment",
    "fixed_expenses",
    "investments",
    "savings",
    "outing_frequency",
];

/// The full feature vector layout, in column order.
pub const COLUMNS: [&str; FEATURE_COUNT] = [
    "monthly_income",
    "age",
    "occupation",
    "city_tier",
    "loan_repayment",
    "fixed_expenses",
    "investments",
    "savings",
    "outing_frequency",
    "Baking",
    "Cooking",
    "Electronics",
    "Fitness",
    "Gaming",
    "Gardening",
    "Photography",
    "Reading",
    "Social Media",
    "Sports",
    "Travel",
    "Video Games",
    "Writing",
];

// Positions of the named columns within COLUMNS.
pub const IDX_MONTHLY_INCOME: usize = 0;
pub const IDX_AGE: usize = 1;
pub const IDX_OCCUPATION: usize = 2;
pub const IDX_CITY_TIER: usize = 3;
pub const IDX_LOAN_REPAYMENT: usize = 4;
pub const IDX_FIXED_EXPENSES: usize = 5;
pub const IDX_INVESTMENTS: usize = 6;
pub const IDX_SAVINGS: usize = 7;
pub const IDX_OUTING_FREQUENCY: usize = 8;

/// First hobby indicator column; hobbies occupy `IDX_HOBBY_START..FEATURE_COUNT`.
pub const IDX_HOBBY_START: usize = 9;

/// Column index for a hobby name, if it is in the vocabulary.
pub fn hobby_index(name: &str) -> Option<usize> {
    HOBBIES
        .iter()
        .position(|h| *h == name)
        .map(|pos| IDX_HOBBY_START + pos)
}

/// True when `recorded` matches `expected` exactly (names and order).
pub fn columns_match(recorded: &[String], expected: &[&str]) -> bool {
    recorded.len() == expected.len()
        && recorded.iter().zip(expected.iter()).all(|(a, b)| a == b)
}

/// Human-readable summary of a column mismatch for error messages.
pub fn describe_mismatch(what: &str, recorded: &[String], expected: &[&str]) -> String {
    if recorded.len() != expected.len() {
        return format!(
            "{} has {} columns, schema v{} expects {}",
            what,
            recorded.len(),
            SCHEMA_VERSION,
            expected.len()
        );
    }
    for (i, (got, want)) in recorded.iter().zip(expected.iter()).enumerate() {
        if got != want {
            return format!(
                "{} column {} is '{}', schema v{} expects '{}'",
                what, i, got, SCHEMA_VERSION, want
            );
        }
    }
    format!("{} matches schema v{}", what, SCHEMA_VERSION)
}
