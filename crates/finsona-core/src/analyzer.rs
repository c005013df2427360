//! Profile classification facade
//!
//! `Analyzer` owns a checked `ModelBundle` and walks one profile through
//! the whole pipeline: validation, encoding, scaling, forest inference,
//! interpretation. Everything it needs is injected through the bundle;
//! there is no global model state anywhere in the crate.

use std::path::Path;

use tracing::debug;

use crate::bundle::ModelBundle;
use crate::encoders::EncoderRegistry;
use crate::error::{Error, Result};
use crate::features;
use crate::models::{CategoricalField, ClassScore, PredictionResult, Profile};

/// Turn an engine prediction into a labeled result.
///
/// Decodes the predicted class code through the class encoder and pairs
/// every class label with its probability. The distribution is reported
/// exactly as the engine produced it, no re-normalization.
pub fn interpret(
    encoders: &EncoderRegistry,
    class_code: usize,
    distribution: &[f64],
) -> Result<PredictionResult> {
    if distribution.len() != encoders.class_count() {
        return Err(Error::ModelInvocation(format!(
            "distribution has {} entries for {} classes",
            distribution.len(),
            encoders.class_count()
        )));
    }
    let label = encoders.decode_class(class_code)?.to_string();
    let scores = encoders
        .domain(CategoricalField::Class)
        .iter()
        .zip(distribution.iter())
        .map(|(class, probability)| ClassScore {
            label: class.clone(),
            probability: *probability,
        })
        .collect();
    Ok(PredictionResult { label, scores })
}

/// The single entry point for classifying profiles.
#[derive(Debug, Clone)]
pub struct Analyzer {
    bundle: ModelBundle,
}

impl Analyzer {
    /// Wrap a bundle, re-running its self-check so a hand-assembled bundle
    /// cannot sneak past startup validation.
    pub fn new(bundle: ModelBundle) -> Result<Self> {
        bundle.self_check()?;
        Ok(Self { bundle })
    }

    /// Analyzer over the artifacts compiled into the library.
    pub fn bundled() -> Result<Self> {
        Self::new(ModelBundle::bundled()?)
    }

    /// Analyzer over an artifact directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Self::new(ModelBundle::load_dir(dir)?)
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Fitted vocabulary for a categorical field, in code order.
    pub fn domain(&self, field: CategoricalField) -> &[String] {
        self.bundle.encoders().domain(field)
    }

    /// The behavior classes the model predicts over, in code order.
    pub fn class_labels(&self) -> &[String] {
        self.bundle.encoders().domain(CategoricalField::Class)
    }

    /// Classify one profile.
    ///
    /// Deterministic: the same profile always yields the same result.
    pub fn analyze(&self, profile: &Profile) -> Result<PredictionResult> {
        let vector = features::build(profile, self.bundle.encoders(), self.bundle.scaler())?;
        let (code, probs) = self.bundle.forest().predict(vector.as_slice())?;
        let result = interpret(self.bundle.encoders(), code, &probs)?;
        debug!(
            label = %result.label,
            confidence = result.confidence(),
            "classified profile"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::EncoderTable;

    fn registry() -> EncoderRegistry {
        let occupation = EncoderTable::new(
            1,
            CategoricalField::Occupation,
            vec!["Salaried".to_string(), "Student".to_string()],
        );
        let city = EncoderTable::new(
            1,
            CategoricalField::CityTier,
            vec!["Tier 1".to_string(), "Tier 2".to_string()],
        );
        let class = EncoderTable::new(
            1,
            CategoricalField::Class,
            vec![
                "Neutral".to_string(),
                "Saver".to_string(),
                "Spender".to_string(),
            ],
        );
        EncoderRegistry::new(occupation, city, class).unwrap()
    }

    #[test]
    fn test_interpret_pairs_labels_in_code_order() {
        let result = interpret(&registry(), 1, &[0.25, 0.6, 0.15]).unwrap();
        assert_eq!(result.label, "Saver");
        assert_eq!(result.scores.len(), 3);
        assert_eq!(result.scores[0].label, "Neutral");
        assert_eq!(result.scores[0].probability, 0.25);
        assert_eq!(result.scores[1].label, "Saver");
        assert_eq!(result.scores[2].label, "Spender");
        assert_eq!(result.scores[2].probability, 0.15);
    }

    #[test]
    fn test_interpret_preserves_engine_values() {
        // Slightly off 1.0 on purpose: interpret must not re-normalize.
        let result = interpret(&registry(), 0, &[0.5, 0.3, 0.1]).unwrap();
        let total: f64 = result.scores.iter().map(|s| s.probability).sum();
        assert!((total - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_interpret_rejects_wrong_distribution_width() {
        assert!(matches!(
            interpret(&registry(), 0, &[0.5, 0.5]),
            Err(Error::ModelInvocation(_))
        ));
    }

    #[test]
    fn test_interpret_rejects_out_of_range_code() {
        assert!(matches!(
            interpret(&registry(), 7, &[0.2, 0.3, 0.5]),
            Err(Error::ModelInvocation(_))
        ));
    }

    #[test]
    fn test_bundled_analyzer_starts_and_exposes_domains() {
        let analyzer = Analyzer::bundled().unwrap();
        assert_eq!(analyzer.class_labels(), &["Neutral", "Saver", "Spender"]);
        assert!(analyzer
            .domain(CategoricalField::Occupation)
            .iter()
            .any(|o| o == "Salaried"));
    }
}
