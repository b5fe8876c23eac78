//! File-backed table store.
//!
//! Each location is one JSON document, `<directory>/<kind>[.<key>].json`.
//! Every read goes to disk, so several processes may share one directory.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use teamforge_config::{ConfigError, Configuration};
use teamforge_core::Table;
use tracing::debug;

use crate::error::StoreError;
use crate::kind::DataKind;
use crate::{location, TableStore};

/// Configuration key of the store directory.
pub const DIRECTORY_KEY: &str = "file.directory";

/// Tables stored as JSON files in one directory.
#[derive(Debug)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Opens `directory`, creating it if missing.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| StoreError::io(&directory, e))?;
            debug!(event = "file_store_created", directory = %directory.display());
        }
        if !directory.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "{} is not a directory",
                directory.display()
            ))
            .into());
        }
        Ok(Self { directory })
    }

    /// Opens the directory named by `file.directory` (default: current directory).
    pub fn from_config(config: &Configuration) -> Result<Self, StoreError> {
        let directory: String = config.get_or(DIRECTORY_KEY, ".".to_string())?;
        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, kind: DataKind, key: Option<&str>) -> PathBuf {
        self.directory.join(format!("{}.json", location(kind, key)))
    }
}

impl TableStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError> {
        let path = self.path(kind, key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Table::default()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, kind: DataKind, key: Option<&str>, table: &Table) -> Result<(), StoreError> {
        let path = self.path(kind, key);
        let text = serde_json::to_string_pretty(table)?;
        fs::write(&path, text).map_err(|e| StoreError::io(&path, e))
    }

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        Ok(self.path(kind, key).is_file())
    }

    fn remove(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        let path = self.path(kind, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}
