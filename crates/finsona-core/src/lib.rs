//! Finsona Core Library
//!
//! Shared functionality for the Finsona financial behavior classifier:
//! - Versioned feature schema (column names, order, hobby vocabulary)
//! - Fitted label encoders for the categorical fields
//! - Standard scaler for the numeric columns
//! - Feature vector assembly
//! - Random forest inference over exported flat-array trees
//! - Artifact bundle loading with startup self-check
//! - CSV import for batch scoring
//!
//! The pipeline is deterministic end to end: the same profile always
//! produces the same feature vector and the same prediction.

pub mod analyzer;
pub mod bundle;
pub mod encoders;
pub mod error;
pub mod features;
pub mod forest;
pub mod import;
pub mod models;
pub mod scaler;
pub mod schema;

pub use analyzer::{interpret, Analyzer};
pub use bundle::ModelBundle;
pub use encoders::{EncoderRegistry, EncoderTable};
pub use error::{Error, Result};
pub use features::FeatureVector;
pub use forest::{RandomForest, Tree};
pub use import::{read_profile_rows, read_profiles_csv};
pub use models::{
    CategoricalField, ClassScore, FinancialIndicators, PredictionResult, Profile,
};
pub use scaler::{NumericRecord, StandardScaler};
