//! Fitted label encoders for the categorical fields
//!
//! Each table is the frozen output of fitting a label encoder during
//! training: an ordered class list where the code IS the position. Encoding
//! is an exact, case-sensitive lookup; anything outside the fitted
//! vocabulary is an `UnknownCategory` error, never a guess.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::CategoricalField;

/// One fitted label encoder: a categorical field plus its class list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderTable {
    /// Schema version the encoder was fitted under.
    pub schema_version: u32,
    field: CategoricalField,
    classes: Vec<String>,
}

impl EncoderTable {
    pub fn new(schema_version: u32, field: CategoricalField, classes: Vec<String>) -> Self {
        Self {
            schema_version,
            field,
            classes,
        }
    }

    pub fn field(&self) -> CategoricalField {
        self.field
    }

    /// The fitted vocabulary, in code order.
    pub fn domain(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Label -> code. Exact match against the fitted vocabulary.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| Error::unknown_category(self.field.as_str(), label))
    }

    /// Code -> label. Out-of-range codes mean the model and encoder disagree.
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.classes.get(code).map(String::as_str).ok_or_else(|| {
            Error::ModelInvocation(format!(
                "class code {} out of range for '{}' encoder ({} classes)",
                code,
                self.field.as_str(),
                self.classes.len()
            ))
        })
    }

    /// Structural checks on a freshly loaded table.
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::ModelInvocation(format!(
                "'{}' encoder has no classes",
                self.field.as_str()
            )));
        }
        for (i, label) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(label) {
                return Err(Error::ModelInvocation(format!(
                    "'{}' encoder lists '{}' twice",
                    self.field.as_str(),
                    label
                )));
            }
        }
        Ok(())
    }
}

/// The three fitted encoders, held together and passed by reference.
///
/// Construction checks each table's field tag against the slot it is loaded
/// into, so swapped artifact files fail at startup instead of silently
/// encoding occupations with city codes.
#[derive(Debug, Clone)]
pub struct EncoderRegistry {
    occupation: EncoderTable,
    city_tier: EncoderTable,
    class: EncoderTable,
}

impl EncoderRegistry {
    pub fn new(
        occupation: EncoderTable,
        city_tier: EncoderTable,
        class: EncoderTable,
    ) -> Result<Self> {
        let slots = [
            (CategoricalField::Occupation, &occupation),
            (CategoricalField::CityTier, &city_tier),
            (CategoricalField::Class, &class),
        ];
        for (expected, table) in slots {
            if table.field() != expected {
                return Err(Error::ModelInvocation(format!(
                    "encoder loaded for '{}' declares field '{}'",
                    expected.as_str(),
                    table.field().as_str()
                )));
            }
            table.validate()?;
        }
        Ok(Self {
            occupation,
            city_tier,
            class,
        })
    }

    fn table(&self, field: CategoricalField) -> &EncoderTable {
        match field {
            CategoricalField::Occupation => &self.occupation,
            CategoricalField::CityTier => &self.city_tier,
            CategoricalField::Class => &self.class,
        }
    }

    /// Encode a label through the table fitted for `field`.
    pub fn encode(&self, field: CategoricalField, label: &str) -> Result<usize> {
        self.table(field).encode(label)
    }

    /// Decode a predicted class code back to its label.
    pub fn decode_class(&self, code: usize) -> Result<&str> {
        self.class.decode(code)
    }

    /// The fitted vocabulary for `field`, in code order.
    pub fn domain(&self, field: CategoricalField) -> &[String] {
        self.table(field).domain()
    }

    /// Number of behavior classes the model predicts over.
    pub fn class_count(&self) -> usize {
        self.class.len()
    }

    /// Schema versions of the three tables, in slot order.
    pub fn schema_versions(&self) -> [u32; 3] {
        [
            self.occupation.schema_version,
            self.city_tier.schema_version,
            self.class.schema_version,
        ]
    }
}
