//! Feature vector assembly
//!
//! Turns one validated profile into the 22-column vector the forest was
//! fitted on: scaled numerics, ordinal label codes, hobby indicator flags.
//! Column order is the schema's, and nothing here reorders or drops a
//! column. The first encoding failure aborts the build; there is no
//! partial vector.

use tracing::debug;

use crate::encoders::EncoderRegistry;
use crate::error::Result;
use crate::models::{CategoricalField, Profile};
use crate::scaler::{NumericRecord, StandardScaler};
use crate::schema::{
    self, FEATURE_COUNT, IDX_AGE, IDX_CITY_TIER, IDX_FIXED_EXPENSES, IDX_INVESTMENTS,
    IDX_LOAN_REPAYMENT, IDX_MONTHLY_INCOME, IDX_OCCUPATION, IDX_OUTING_FREQUENCY, IDX_SAVINGS,
};

/// A fully assembled model input row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

/// Assemble the feature vector for one profile.
///
/// Validates the profile, encodes the two categorical fields, scales the
/// numeric subset, and sets hobby flags, all in schema column order. Label
/// codes are emitted as floats but never pass through the scaler.
pub fn build(
    profile: &Profile,
    encoders: &EncoderRegistry,
    scaler: &StandardScaler,
) -> Result<FeatureVector> {
    profile.validate()?;

    let occupation_code = encoders.encode(CategoricalField::Occupation, &profile.occupation)?;
    let city_code = encoders.encode(CategoricalField::CityTier, &profile.city_tier)?;
    let scaled = scaler.transform(&NumericRecord::from_profile(profile))?;

    let mut values = [0.0; FEATURE_COUNT];
    values[IDX_MONTHLY_INCOME] = scaled[0];
    values[IDX_AGE] = scaled[1];
    values[IDX_OCCUPATION] = occupation_code as f64;
    values[IDX_CITY_TIER] = city_code as f64;
    values[IDX_LOAN_REPAYMENT] = scaled[2];
    values[IDX_FIXED_EXPENSES] = scaled[3];
    values[IDX_INVESTMENTS] = scaled[4];
    values[IDX_SAVINGS] = scaled[5];
    values[IDX_OUTING_FREQUENCY] = scaled[6];
    for hobby in &profile.hobbies {
        // Unknown hobbies were rejected by validate() above.
        if let Some(idx) = schema::hobby_index(hobby) {
            values[idx] = 1.0;
        }
    }

    debug!(
        occupation_code,
        city_code,
        hobby_count = profile.hobbies.len(),
        "assembled feature vector"
    );
    Ok(FeatureVector::new(values))
}
