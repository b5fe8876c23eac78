//! Error types for scoring models.

use teamforge_core::{DataError, ErrorKind};
use thiserror::Error;

/// Errors raised while decoding evaluation models or scored results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Data(#[from] DataError),

    /// An evaluation row has no name.
    #[error("Evaluation row {row} has no evaluation name")]
    MissingModelName { row: usize },

    /// A weight cell is not an integer.
    #[error("Weight {column} must be an integer, found {value}")]
    InvalidWeight { column: String, value: f64 },

    /// A feature name does not match any known feature.
    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::UnknownFeature(_) => ErrorKind::Configuration,
            _ => ErrorKind::DataContract,
        }
    }
}
