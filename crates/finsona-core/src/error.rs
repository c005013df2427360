//! Error types for Finsona

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown category for field '{field}': '{value}'")]
    UnknownCategory { field: String, value: String },

    #[error("Feature shape mismatch: {0}")]
    FeatureShape(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an unknown-category error from field/value pairs of any string type.
    pub fn unknown_category(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::UnknownCategory {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
