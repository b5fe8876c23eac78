//! Error types for table stores.

use std::io;
use std::path::PathBuf;

use teamforge_config::ConfigError;
use teamforge_core::{DataError, ErrorKind};
use teamforge_scoring::ScoringError;
use thiserror::Error;

/// Errors raised by table stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend does not support the requested operation.
    #[error("{operation} not supported for {store} storage")]
    Unsupported {
        store: &'static str,
        operation: String,
    },

    /// A `store.<data-kind>` value names no known backend.
    #[error("Unknown store type '{0}'")]
    UnknownStore(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend returned data that is not a table.
    #[error("Malformed table from {store}: {reason}")]
    Malformed {
        store: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Unsupported { .. }
            | StoreError::UnknownStore(_)
            | StoreError::Config(_) => ErrorKind::Configuration,
            StoreError::Malformed { .. } | StoreError::Data(_) => ErrorKind::DataContract,
            StoreError::Scoring(e) => e.kind(),
            StoreError::Io { .. } | StoreError::Json(_) | StoreError::Http(_) => {
                ErrorKind::Storage
            }
        }
    }

    pub(crate) fn unsupported(store: &'static str, operation: impl Into<String>) -> Self {
        StoreError::Unsupported {
            store,
            operation: operation.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
