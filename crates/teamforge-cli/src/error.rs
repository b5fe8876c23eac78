//! CLI errors and process exit codes.
//!
//! Exit codes:
//! - 0: success
//! - 1: the run finished but at least one model failed
//! - 2: configuration error
//! - 3: data contract violation
//! - 4: storage failure

use std::io;
use std::process::ExitCode;

use teamforge_config::ConfigError;
use teamforge_core::ErrorKind;
use teamforge_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),

    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    PartialFailure = 1,
    Configuration = 2,
    DataContract = 3,
    Storage = 4,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<ErrorKind> for CliExitCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Configuration => CliExitCode::Configuration,
            ErrorKind::DataContract => CliExitCode::DataContract,
            ErrorKind::Storage => CliExitCode::Storage,
        }
    }
}

impl From<&CliError> for CliExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::Config(_) => CliExitCode::Configuration,
            CliError::Engine(e) => e.kind().into(),
            CliError::Io(_) | CliError::Json(_) => CliExitCode::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_by_kind() {
        let err = CliError::from(EngineError::UnknownModel("m".to_string()));
        assert_eq!(CliExitCode::from(&err), CliExitCode::DataContract);
        let err = CliError::from(EngineError::InvalidTaskName("m".to_string()));
        assert_eq!(CliExitCode::from(&err), CliExitCode::Configuration);
        let err = CliError::from(ConfigError::MissingKey("partition-size".to_string()));
        assert_eq!(CliExitCode::from(&err), CliExitCode::Configuration);
    }
}
