//! Loading and checking the fitted model artifacts
//!
//! A deployment ships five artifacts, exported together by the training
//! pipeline: the forest, one label encoder per categorical field (including
//! the prediction target), and the standard scaler. They are only valid as
//! a set, so this module loads them as one `ModelBundle` and cross-checks
//! them against the compiled-in schema before anyone predicts with them.
//!
//! A default set of artifacts is compiled into the library, so binaries
//! work with no model directory at all; `load_dir` supports swapping in a
//! newer fitted set without rebuilding.

use std::path::Path;

use tracing::{debug, info};

use crate::encoders::{EncoderRegistry, EncoderTable};
use crate::error::{Error, Result};
use crate::forest::RandomForest;
use crate::scaler::StandardScaler;
use crate::schema;

/// Artifact file names, as written by the training export.
pub const FOREST_FILE: &str = "random_forest.json";
pub const ENCODER_OCCUPATION_FILE: &str = "label_encoder_occupation.json";
pub const ENCODER_CITY_TIER_FILE: &str = "label_encoder_city_tier.json";
pub const ENCODER_CLASS_FILE: &str = "label_encoder_class.json";
pub const SCALER_FILE: &str = "standard_scaler.json";

const BUNDLED_FOREST: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/random_forest.json"));
const BUNDLED_ENCODER_OCCUPATION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/artifacts/label_encoder_occupation.json"
));
const BUNDLED_ENCODER_CITY_TIER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/artifacts/label_encoder_city_tier.json"
));
const BUNDLED_ENCODER_CLASS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/artifacts/label_encoder_class.json"
));
const BUNDLED_SCALER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/standard_scaler.json"));

/// The five fitted artifacts, loaded and cross-checked as a set.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    encoders: EncoderRegistry,
    scaler: StandardScaler,
    forest: RandomForest,
}

impl ModelBundle {
    /// Assemble a bundle from already-parsed parts, without checks.
    ///
    /// Callers are expected to run `self_check` before predicting; the
    /// loading constructors do it for them.
    pub fn from_parts(
        encoders: EncoderRegistry,
        scaler: StandardScaler,
        forest: RandomForest,
    ) -> Self {
        Self {
            encoders,
            scaler,
            forest,
        }
    }

    /// Load and cross-check the artifact set from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            let path = dir.join(name);
            debug!(file = %path.display(), "reading artifact");
            Ok(std::fs::read_to_string(path)?)
        };
        let bundle = Self::parse(
            &read(FOREST_FILE)?,
            &read(ENCODER_OCCUPATION_FILE)?,
            &read(ENCODER_CITY_TIER_FILE)?,
            &read(ENCODER_CLASS_FILE)?,
            &read(SCALER_FILE)?,
        )?;
        info!(
            dir = %dir.display(),
            trees = bundle.forest.tree_count(),
            classes = bundle.encoders.class_count(),
            "loaded model artifacts"
        );
        Ok(bundle)
    }

    /// Load and cross-check the artifact set compiled into the library.
    pub fn bundled() -> Result<Self> {
        let bundle = Self::parse(
            BUNDLED_FOREST,
            BUNDLED_ENCODER_OCCUPATION,
            BUNDLED_ENCODER_CITY_TIER,
            BUNDLED_ENCODER_CLASS,
            BUNDLED_SCALER,
        )?;
        info!(
            trees = bundle.forest.tree_count(),
            classes = bundle.encoders.class_count(),
            "loaded bundled model artifacts"
        );
        Ok(bundle)
    }

    fn parse(
        forest_json: &str,
        occupation_json: &str,
        city_tier_json: &str,
        class_json: &str,
        scaler_json: &str,
    ) -> Result<Self> {
        let forest: RandomForest = serde_json::from_str(forest_json)?;
        let occupation: EncoderTable = serde_json::from_str(occupation_json)?;
        let city_tier: EncoderTable = serde_json::from_str(city_tier_json)?;
        let class: EncoderTable = serde_json::from_str(class_json)?;
        let scaler: StandardScaler = serde_json::from_str(scaler_json)?;

        let bundle = Self::from_parts(
            EncoderRegistry::new(occupation, city_tier, class)?,
            scaler,
            forest,
        );
        bundle.self_check()?;
        Ok(bundle)
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Verify the artifact set is usable with this build.
    ///
    /// Checks, in order: every artifact carries the compiled-in schema
    /// version, each artifact is structurally sound, the forest and scaler
    /// column lists match the schema, the forest's class count matches the
    /// class encoder, and one canary row makes it through inference with a
    /// distribution that sums to 1. This is what a health endpoint should
    /// run at startup; any error here means "unhealthy", not "degrade
    /// quietly".
    pub fn self_check(&self) -> Result<()> {
        let versions = [
            ("forest", self.forest.schema_version),
            ("scaler", self.scaler.schema_version),
            ("occupation encoder", self.encoders.schema_versions()[0]),
            ("city_tier encoder", self.encoders.schema_versions()[1]),
            ("class encoder", self.encoders.schema_versions()[2]),
        ];
        for (artifact, version) in versions {
            if version != schema::SCHEMA_VERSION {
                return Err(Error::FeatureShape(format!(
                    "{} was fitted under schema v{}, this build expects v{}",
                    artifact,
                    version,
                    schema::SCHEMA_VERSION
                )));
            }
        }

        self.forest.validate()?;
        self.scaler.validate()?;

        if !schema::columns_match(self.forest.columns(), &schema::COLUMNS) {
            return Err(Error::FeatureShape(schema::describe_mismatch(
                "forest",
                self.forest.columns(),
                &schema::COLUMNS,
            )));
        }
        if !schema::columns_match(self.scaler.columns(), &schema::NUMERIC_COLUMNS) {
            return Err(Error::FeatureShape(schema::describe_mismatch(
                "scaler",
                self.scaler.columns(),
                &schema::NUMERIC_COLUMNS,
            )));
        }
        if self.forest.n_classes() != self.encoders.class_count() {
            return Err(Error::FeatureShape(format!(
                "forest predicts over {} classes, class encoder lists {}",
                self.forest.n_classes(),
                self.encoders.class_count()
            )));
        }

        // Canary row: every column at the fitted mean scales to zero, codes
        // and flags at zero are always in range.
        let canary = [0.0; schema::FEATURE_COUNT];
        let probs = self.forest.predict_proba(&canary)?;
        let total: f64 = probs.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(Error::ModelInvocation(format!(
                "canary distribution sums to {}",
                total
            )));
        }
        debug!("artifact self-check passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoricalField;

    fn good_bundle() -> ModelBundle {
        ModelBundle::bundled().unwrap()
    }

    #[test]
    fn test_bundled_artifacts_pass_self_check() {
        let bundle = good_bundle();
        bundle.self_check().unwrap();
        assert_eq!(bundle.forest().n_features(), schema::FEATURE_COUNT);
        assert_eq!(bundle.encoders().class_count(), 3);
    }

    #[test]
    fn test_bundled_domains_are_populated() {
        let bundle = good_bundle();
        assert_eq!(
            bundle.encoders().domain(CategoricalField::Class),
            &["Neutral", "Saver", "Spender"]
        );
        assert_eq!(bundle.encoders().domain(CategoricalField::CityTier).len(), 3);
        assert!(!bundle.encoders().domain(CategoricalField::Occupation).is_empty());
    }

    #[test]
    fn test_self_check_rejects_stale_schema_version() {
        let bundle = good_bundle();
        let mut forest_json = serde_json::to_value(bundle.forest()).unwrap();
        forest_json["schema_version"] = serde_json::Value::from(99);
        let stale: RandomForest = serde_json::from_value(forest_json).unwrap();
        let broken = ModelBundle::from_parts(
            bundle.encoders().clone(),
            bundle.scaler().clone(),
            stale,
        );
        let err = broken.self_check().unwrap_err();
        assert!(matches!(err, Error::FeatureShape(_)));
        assert!(err.to_string().contains("v99"));
    }

    #[test]
    fn test_self_check_rejects_column_drift() {
        let bundle = good_bundle();
        let mut forest_json = serde_json::to_value(bundle.forest()).unwrap();
        let cols = forest_json["columns"].as_array_mut().unwrap();
        cols.swap(0, 1);
        let drifted: RandomForest = serde_json::from_value(forest_json).unwrap();
        let broken = ModelBundle::from_parts(
            bundle.encoders().clone(),
            bundle.scaler().clone(),
            drifted,
        );
        assert!(matches!(
            broken.self_check(),
            Err(Error::FeatureShape(_))
        ));
    }

    #[test]
    fn test_self_check_rejects_class_count_mismatch() {
        let bundle = good_bundle();
        let mut forest_json = serde_json::to_value(bundle.forest()).unwrap();
        forest_json["n_classes"] = serde_json::Value::from(4);
        let mismatched: RandomForest = serde_json::from_value(forest_json).unwrap();
        let broken = ModelBundle::from_parts(
            bundle.encoders().clone(),
            bundle.scaler().clone(),
            mismatched,
        );
        assert!(broken.self_check().is_err());
    }

    #[test]
    fn test_load_dir_round_trips_the_bundled_set() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = good_bundle();
        let files = [
            (FOREST_FILE, serde_json::to_string(bundle.forest()).unwrap()),
            (SCALER_FILE, serde_json::to_string(bundle.scaler()).unwrap()),
            (
                ENCODER_OCCUPATION_FILE,
                serde_json::to_string(&encoder_json(&bundle, CategoricalField::Occupation)).unwrap(),
            ),
            (
                ENCODER_CITY_TIER_FILE,
                serde_json::to_string(&encoder_json(&bundle, CategoricalField::CityTier)).unwrap(),
            ),
            (
                ENCODER_CLASS_FILE,
                serde_json::to_string(&encoder_json(&bundle, CategoricalField::Class)).unwrap(),
            ),
        ];
        for (name, json) in files {
            std::fs::write(dir.path().join(name), json).unwrap();
        }
        let reloaded = ModelBundle::load_dir(dir.path()).unwrap();
        assert_eq!(reloaded.forest().tree_count(), bundle.forest().tree_count());
    }

    #[test]
    fn test_load_dir_missing_artifact_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelBundle::load_dir(dir.path()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_load_dir_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            FOREST_FILE,
            ENCODER_OCCUPATION_FILE,
            ENCODER_CITY_TIER_FILE,
            ENCODER_CLASS_FILE,
            SCALER_FILE,
        ] {
            std::fs::write(dir.path().join(name), "{not json").unwrap();
        }
        assert!(matches!(
            ModelBundle::load_dir(dir.path()),
            Err(Error::Json(_))
        ));
    }

    fn encoder_json(bundle: &ModelBundle, field: CategoricalField) -> EncoderTable {
        EncoderTable::new(
            schema::SCHEMA_VERSION,
            field,
            bundle.encoders().domain(field).to_vec(),
        )
    }
}
