//! Standard scaler for the numeric profile columns
//!
//! Applies the frozen `(value - mean) / scale` transform fitted during
//! training. Only the seven numeric columns pass through here; ordinal
//! label codes and hobby flags never do.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Profile;
use crate::schema::{self, NUMERIC_FEATURE_COUNT};

/// The numeric subset of a profile, in canonical scaler input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRecord {
    values: [f64; NUMERIC_FEATURE_COUNT],
}

impl NumericRecord {
    /// Pull the numeric columns out of a profile, in schema order.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            values: [
                profile.monthly_income,
                f64::from(profile.age),
                profile.loan_repayment,
                profile.fixed_expenses,
                profile.investments,
                profile.savings,
                f64::from(profile.outing_frequency),
            ],
        }
    }

    /// Column names for the record layout, shared with the schema.
    pub fn columns() -> &'static [&'static str] {
        &schema::NUMERIC_COLUMNS
    }

    pub fn values(&self) -> &[f64; NUMERIC_FEATURE_COUNT] {
        &self.values
    }
}

/// Fitted standard scaler parameters, loaded from the scaler artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Schema version the scaler was fitted under.
    pub schema_version: u32,
    columns: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(
        schema_version: u32,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self> {
        let scaler = Self {
            schema_version,
            columns,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// The columns the scaler was fitted on, in input order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Structural checks on freshly loaded parameters.
    ///
    /// A zero or non-finite scale would turn the transform into a NaN/inf
    /// factory, so it is rejected here instead of surfacing as a weird
    /// prediction later.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::ModelInvocation(
                "scaler artifact has no columns".to_string(),
            ));
        }
        if self.mean.len() != self.columns.len() || self.scale.len() != self.columns.len() {
            return Err(Error::ModelInvocation(format!(
                "scaler arrays disagree: {} columns, {} means, {} scales",
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        for (i, (mean, scale)) in self.mean.iter().zip(self.scale.iter()).enumerate() {
            if !mean.is_finite() || !scale.is_finite() {
                return Err(Error::ModelInvocation(format!(
                    "scaler column '{}' has non-finite parameters",
                    self.columns[i]
                )));
            }
            if *scale == 0.0 {
                return Err(Error::ModelInvocation(format!(
                    "scaler column '{}' has zero scale",
                    self.columns[i]
                )));
            }
        }
        Ok(())
    }

    /// Apply the fitted transform to one numeric record.
    ///
    /// The record layout must exactly match the fitted columns, names and
    /// order both. A mismatch means the artifact and this build disagree
    /// about the schema, which is a hard error, not something to paper over.
    pub fn transform(&self, record: &NumericRecord) -> Result<[f64; NUMERIC_FEATURE_COUNT]> {
        if !schema::columns_match(&self.columns, NumericRecord::columns()) {
            return Err(Error::FeatureShape(schema::describe_mismatch(
                "scaler",
                &self.columns,
                NumericRecord::columns(),
            )));
        }
        if self.mean.len() != NUMERIC_FEATURE_COUNT || self.scale.len() != NUMERIC_FEATURE_COUNT {
            return Err(Error::ModelInvocation(format!(
                "scaler arrays disagree: {} columns, {} means, {} scales",
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        let mut scaled = [0.0; NUMERIC_FEATURE_COUNT];
        for (i, value) in record.values().iter().enumerate() {
            scaled[i] = (value - self.mean[i]) / self.scale[i];
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_columns() -> Vec<String> {
        schema::NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn fitted_scaler() -> StandardScaler {
        StandardScaler::new(
            1,
            schema_columns(),
            vec![50000.0, 35.0, 5000.0, 20000.0, 8000.0, 9000.0, 6.0],
            vec![20000.0, 10.0, 4000.0, 8000.0, 6000.0, 7000.0, 4.0],
        )
        .unwrap()
    }

    fn sample_profile() -> Profile {
        Profile {
            monthly_income: 60000.0,
            age: 45,
            occupation: "Salaried".to_string(),
            city_tier: "Tier 2".to_string(),
            loan_repayment: 9000.0,
            fixed_expenses: 16000.0,
            investments: 11000.0,
            savings: 2000.0,
            outing_frequency: 10,
            hobbies: vec![],
        }
    }

    #[test]
    fn test_record_layout_follows_schema() {
        let record = NumericRecord::from_profile(&sample_profile());
        let values = record.values();
        assert_eq!(values[0], 60000.0);
        assert_eq!(values[1], 45.0);
        assert_eq!(values[2], 9000.0);
        assert_eq!(values[3], 16000.0);
        assert_eq!(values[4], 11000.0);
        assert_eq!(values[5], 2000.0);
        assert_eq!(values[6], 10.0);
    }

    #[test]
    fn test_transform_applies_fitted_parameters() {
        let scaler = fitted_scaler();
        let record = NumericRecord::from_profile(&sample_profile());
        let scaled = scaler.transform(&record).unwrap();
        assert!((scaled[0] - 0.5).abs() < 1e-12);
        assert!((scaled[1] - 1.0).abs() < 1e-12);
        assert!((scaled[2] - 1.0).abs() < 1e-12);
        assert!((scaled[3] + 0.5).abs() < 1e-12);
        assert!((scaled[4] - 0.5).abs() < 1e-12);
        assert!((scaled[5] + 1.0).abs() < 1e-12);
        assert!((scaled[6] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let scaler = fitted_scaler();
        let record = NumericRecord::from_profile(&sample_profile());
        let first = scaler.transform(&record).unwrap();
        let second = scaler.transform(&record).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_transform_rejects_column_drift() {
        let mut columns = schema_columns();
        columns.swap(0, 1);
        let scaler = StandardScaler::new(
            1,
            columns,
            vec![0.0; NUMERIC_FEATURE_COUNT],
            vec![1.0; NUMERIC_FEATURE_COUNT],
        )
        .unwrap();
        let record = NumericRecord::from_profile(&sample_profile());
        assert!(matches!(
            scaler.transform(&record),
            Err(Error::FeatureShape(_))
        ));
    }

    #[test]
    fn test_transform_rejects_missing_column() {
        let scaler = StandardScaler::new(
            1,
            schema_columns()[..NUMERIC_FEATURE_COUNT - 1].to_vec(),
            vec![0.0; NUMERIC_FEATURE_COUNT - 1],
            vec![1.0; NUMERIC_FEATURE_COUNT - 1],
        )
        .unwrap();
        let record = NumericRecord::from_profile(&sample_profile());
        let err = scaler.transform(&record).unwrap_err();
        assert!(err.to_string().contains("6 columns"));
    }

    #[test]
    fn test_zero_scale_rejected_at_construction() {
        let mut scale = vec![1.0; NUMERIC_FEATURE_COUNT];
        scale[3] = 0.0;
        let err = StandardScaler::new(
            1,
            schema_columns(),
            vec![0.0; NUMERIC_FEATURE_COUNT],
            scale,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fixed_expenses"));
    }

    #[test]
    fn test_mismatched_array_lengths_rejected() {
        let err = StandardScaler::new(
            1,
            schema_columns(),
            vec![0.0; 3],
            vec![1.0; NUMERIC_FEATURE_COUNT],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ModelInvocation(_)));
    }
}
