//! Error types for teamforge

use thiserror::Error;

/// Violation of the enriched-data contract.
///
/// Raised when a roster or table does not carry what the scoring models need.
/// These are never coerced into default values: a silent zero would corrupt
/// every ranking that includes the affected row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A row lacks a column (or has an empty cell) the consumer requires.
    #[error("Row {row} is missing required attribute '{attribute}'")]
    MissingAttribute { row: usize, attribute: String },

    /// A cell holds a value that cannot be used for the attribute.
    #[error("Row {row} has invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue {
        row: usize,
        attribute: String,
        value: String,
    },

    /// A row was pushed with the wrong number of cells.
    #[error("Row has {actual} cells but the table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// A candidate name was looked up but is not in the roster.
    #[error("Unknown candidate '{0}'")]
    UnknownCandidate(String),

    /// Two roster rows share the same name.
    #[error("Duplicate candidate '{0}' in roster")]
    DuplicateCandidate(String),
}

/// Classification of failures, used by callers to choose a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing required key or unsupported store operation. Fatal, never retried.
    Configuration,

    /// Input data breaks the enrichment contract. Fatal for the affected
    /// scoring model only.
    DataContract,

    /// Read or write failure on a table store. Propagated to the caller,
    /// which owns the retry policy.
    Storage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::DataContract => write!(f, "data contract"),
            ErrorKind::Storage => write!(f, "storage"),
        }
    }
}
