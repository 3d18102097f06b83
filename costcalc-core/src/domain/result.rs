//! Result document domain types

use serde_json::{Map, Value};
use thiserror::Error;

/// Field of the result document holding the result reference
pub const RESULT_REFERENCE_FIELD: &str = "drive_link";

/// Reasons a stored result document cannot be used (yet)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResultDocumentError {
    #[error("result document is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("result document is not a JSON object")]
    NotAnObject,

    #[error("drive_link missing in result document")]
    MissingReference,
}

/// The result document the remote job writes once it has finished
#[derive(Debug, Clone, PartialEq)]
pub struct ResultDocument {
    fields: Map<String, Value>,
}

impl ResultDocument {
    /// Parses raw object bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, ResultDocumentError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ResultDocumentError::InvalidJson(e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ResultDocumentError::NotAnObject),
        }
    }

    /// The result reference, if present as a non-empty string
    pub fn reference(&self) -> Result<&str, ResultDocumentError> {
        self.fields
            .get(RESULT_REFERENCE_FIELD)
            .and_then(Value::as_str)
            .filter(|link| !link.trim().is_empty())
            .ok_or(ResultDocumentError::MissingReference)
    }

    /// Any other field the job chose to write
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
