//! Error types for the engine.

use teamforge_config::ConfigError;
use teamforge_core::{DataError, ErrorKind};
use teamforge_scoring::ScoringError;
use teamforge_store::StoreError;
use thiserror::Error;

/// Errors raised while distributing, evaluating or reducing.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Data(#[from] DataError),

    /// No evaluation model has this name.
    #[error("Unknown evaluation model '{0}'")]
    UnknownModel(String),

    /// A task names a partition descriptor that was never written.
    #[error("Partition descriptor '{0}' not found")]
    MissingPartition(String),

    /// A model has no enriched roster.
    #[error("Enriched library for model '{0}' not found")]
    MissingRoster(String),

    /// A partition descriptor exists but its result does not.
    #[error("Partition result '{0}' not found; the task failed or never ran")]
    MissingPartitionResult(String),

    /// A partition descriptor reaches past the end of the roster.
    #[error("Partition '{task}' reaches row {hi} of a {len}-row roster")]
    BlockOutOfRange { task: String, hi: usize, len: usize },

    /// A task name is not of the form `<model>.<seq>`.
    #[error("Invalid partition task name '{0}'")]
    InvalidTaskName(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    /// Classifies this error for the caller's retry and abort policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Config(_)
            | EngineError::InvalidTaskName(_)
            | EngineError::WorkerPool(_) => ErrorKind::Configuration,
            EngineError::Store(e) => e.kind(),
            EngineError::Scoring(e) => e.kind(),
            EngineError::Data(_)
            | EngineError::UnknownModel(_)
            | EngineError::MissingPartition(_)
            | EngineError::MissingRoster(_)
            | EngineError::MissingPartitionResult(_)
            | EngineError::BlockOutOfRange { .. } => ErrorKind::DataContract,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            EngineError::from(ConfigError::MissingKey("results-size".into())).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EngineError::MissingPartitionResult("m.3".into()).kind(),
            ErrorKind::DataContract
        );
        assert_eq!(
            EngineError::from(StoreError::Unsupported {
                store: "configuration",
                operation: "Writing".into()
            })
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EngineError::from(DataError::UnknownCandidate("Mew".into())).kind(),
            ErrorKind::DataContract
        );
    }

    #[test]
    fn test_messages() {
        let err = EngineError::BlockOutOfRange {
            task: "m.0".into(),
            hi: 12,
            len: 10,
        };
        assert_eq!(err.to_string(), "Partition 'm.0' reaches row 12 of a 10-row roster");
        assert_eq!(
            EngineError::UnknownModel("x".into()).to_string(),
            "Unknown evaluation model 'x'"
        );
    }
}
