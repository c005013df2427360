//! Domain models for Finsona

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema;

/// The categorical fields covered by fitted label encoders.
///
/// `Class` is the prediction target; the other two are input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Occupation,
    CityTier,
    Class,
}

impl CategoricalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupation => "occupation",
            Self::CityTier => "city_tier",
            Self::Class => "class",
        }
    }
}

impl std::str::FromStr for CategoricalField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "occupation" => Ok(Self::Occupation),
            "city_tier" | "citytier" => Ok(Self::CityTier),
            "class" => Ok(Self::Class),
            _ => Err(format!("Unknown categorical field: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ages the model was trained on; out-of-range profiles are rejected
/// rather than extrapolated.
pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 18..=80;

/// Most discretionary outings per month the model was trained on.
pub const MAX_OUTING_FREQUENCY: u32 = 30;

/// One person's financial profile, as supplied by a caller.
///
/// Monetary fields are per month, in the same currency the model was
/// fitted on. `occupation` and `city_tier` must match the fitted
/// vocabularies exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub monthly_income: f64,
    pub age: u32,
    pub occupation: String,
    pub city_tier: String,
    pub loan_repayment: f64,
    pub fixed_expenses: f64,
    pub investments: f64,
    pub savings: f64,
    pub outing_frequency: u32,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

impl Profile {
    /// Reject profiles that cannot be encoded before any model work starts.
    ///
    /// Money fields must be non-negative and finite; age and outing
    /// frequency must sit inside the ranges the model was trained on;
    /// hobby names must come from the fixed vocabulary. Occupation and
    /// city tier are checked later against the fitted encoders, which own
    /// those vocabularies.
    pub fn validate(&self) -> Result<()> {
        let money = [
            ("monthly_income", self.monthly_income),
            ("loan_repayment", self.loan_repayment),
            ("fixed_expenses", self.fixed_expenses),
            ("investments", self.investments),
            ("savings", self.savings),
        ];
        for (name, value) in money {
            if !value.is_finite() {
                return Err(Error::InvalidData(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(Error::InvalidData(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !AGE_RANGE.contains(&self.age) {
            return Err(Error::InvalidData(format!(
                "age must be between {} and {}, got {}",
                AGE_RANGE.start(),
                AGE_RANGE.end(),
                self.age
            )));
        }
        if self.outing_frequency > MAX_OUTING_FREQUENCY {
            return Err(Error::InvalidData(format!(
                "outing_frequency must be at most {} per month, got {}",
                MAX_OUTING_FREQUENCY, self.outing_frequency
            )));
        }
        for hobby in &self.hobbies {
            if schema::hobby_index(hobby).is_none() {
                return Err(Error::InvalidData(format!("Unknown hobby: '{}'", hobby)));
            }
        }
        Ok(())
    }

    /// Ratio summary of the profile, independent of the model.
    pub fn indicators(&self) -> FinancialIndicators {
        let ratio = |amount: f64| {
            if self.monthly_income > 0.0 {
                amount / self.monthly_income
            } else {
                0.0
            }
        };
        FinancialIndicators {
            savings_ratio: ratio(self.savings),
            investment_ratio: ratio(self.investments),
            fixed_expense_ratio: ratio(self.fixed_expenses + self.loan_repayment),
        }
    }
}

/// Spending ratios shown alongside a prediction.
///
/// All three are fractions of monthly income and fall back to 0 when
/// income is 0, so callers never divide by zero themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialIndicators {
    pub savings_ratio: f64,
    pub investment_ratio: f64,
    pub fixed_expense_ratio: f64,
}

/// Probability assigned to one behavior class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    pub probability: f64,
}

/// The outcome of classifying one profile.
///
/// `scores` carries one entry per class in class-code order; the values are
/// the engine's averaged probabilities, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub scores: Vec<ClassScore>,
}

impl PredictionResult {
    /// Scores sorted by descending probability.
    pub fn ranked(&self) -> Vec<ClassScore> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked
    }

    /// Probability assigned to the predicted label.
    pub fn confidence(&self) -> f64 {
        self.probability_of(&self.label).unwrap_or(0.0)
    }

    /// Probability for a specific class label, if present.
    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            monthly_income: 50000.0,
            age: 30,
            occupation: "Salaried".to_string(),
            city_tier: "Tier 1".to_string(),
            loan_repayment: 5000.0,
            fixed_expenses: 20000.0,
            investments: 10000.0,
            savings: 10000.0,
            outing_frequency: 5,
            hobbies: vec!["Reading".to_string()],
        }
    }

    #[test]
    fn test_validate_accepts_sane_profile() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_money() {
        let mut profile = sample_profile();
        profile.savings = -1.0;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("savings"));
    }

    #[test]
    fn test_validate_rejects_non_finite_money() {
        let mut profile = sample_profile();
        profile.monthly_income = f64::NAN;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_hobby() {
        let mut profile = sample_profile();
        profile.hobbies.push("Knitting".to_string());
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("Knitting"));
    }

    #[test]
    fn test_validate_bounds_age_to_trained_range() {
        let mut profile = sample_profile();
        profile.age = 17;
        assert!(profile.validate().unwrap_err().to_string().contains("age"));
        profile.age = 81;
        assert!(profile.validate().is_err());
        profile.age = 18;
        assert!(profile.validate().is_ok());
        profile.age = 80;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_outing_frequency() {
        let mut profile = sample_profile();
        profile.outing_frequency = 31;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("outing_frequency"));
        profile.outing_frequency = 30;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_indicators_ratios() {
        let profile = sample_profile();
        let ind = profile.indicators();
        assert!((ind.savings_ratio - 0.2).abs() < 1e-12);
        assert!((ind.investment_ratio - 0.2).abs() < 1e-12);
        assert!((ind.fixed_expense_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_indicators_zero_income() {
        let mut profile = sample_profile();
        profile.monthly_income = 0.0;
        let ind = profile.indicators();
        assert_eq!(ind.savings_ratio, 0.0);
        assert_eq!(ind.investment_ratio, 0.0);
        assert_eq!(ind.fixed_expense_ratio, 0.0);
    }

    #[test]
    fn test_categorical_field_round_trip() {
        for field in [
            CategoricalField::Occupation,
            CategoricalField::CityTier,
            CategoricalField::Class,
        ] {
            let parsed: CategoricalField = field.as_str().parse().unwrap();
            assert_eq!(parsed, field);
        }
        assert!("hobby".parse::<CategoricalField>().is_err());
    }

    #[test]
    fn test_prediction_result_ranked_and_confidence() {
        let result = PredictionResult {
            label: "Saver".to_string(),
            scores: vec![
                ClassScore {
                    label: "Neutral".to_string(),
                    probability: 0.3,
                },
                ClassScore {
                    label: "Saver".to_string(),
                    probability: 0.6,
                },
                ClassScore {
                    label: "Spender".to_string(),
                    probability: 0.1,
                },
            ],
        };
        let ranked = result.ranked();
        assert_eq!(ranked[0].label, "Saver");
        assert_eq!(ranked[2].label, "Spender");
        assert!((result.confidence() - 0.6).abs() < 1e-12);
        assert_eq!(result.probability_of("Sleeper"), None);
    }

    #[test]
    fn test_profile_json_defaults_hobbies() {
        let json = r#"{
            "monthly_income": 42000.0,
            "age": 28,
            "occupation": "Student",
            "city_tier": "Tier 2",
            "loan_repayment": 0.0,
            "fixed_expenses": 15000.0,
            "investments": 2000.0,
            "savings": 3000.0,
            "outing_frequency": 8
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.hobbies.is_empty());
        assert_eq!(profile.occupation, "Student");
    }
}
