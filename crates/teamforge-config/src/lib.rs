//! Configuration system for teamforge.
//!
//! Configuration is a tree of YAML values addressed by dotted paths. It is
//! assembled from YAML or TOML files plus `dotted.path=value` overrides, and
//! handed explicitly to the stores and the engine.
//!
//! # Examples
//!
//! ```
//! use teamforge_config::{Configuration, EngineSettings};
//!
//! let mut config = Configuration::from_yaml_str(r#"
//!     partition-size: 1000
//!     results-size: 10
//!     store:
//!       partition: memory
//! "#).unwrap();
//! config.set("results-size", "25").unwrap();
//!
//! let settings = EngineSettings::from_config(&config).unwrap();
//! assert_eq!(settings.partition_volume, 1000);
//! assert_eq!(settings.results_size, 25);
//! assert_eq!(config.get_or("store.partition", String::new()).unwrap(), "memory");
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::info;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required property {0} from configuration")]
    MissingKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Dotted-path configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    root: Value,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(s)?;
        Self::from_value(root)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let table: toml::Value = toml::from_str(s)?;
        Self::from_value(serde_yaml::to_value(table)?)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads a configuration file, choosing the format by extension.
    ///
    /// `.toml` files are parsed as TOML; anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(event = "config_file", path = %path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    /// Builds configuration from command line arguments.
    ///
    /// An argument containing `=` is a `dotted.path=value` override; any other
    /// argument names a configuration file. Files are merged in order, then
    /// overrides are applied on top.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files = Vec::new();
        let mut overrides = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) => overrides.push((key.to_string(), value.to_string())),
                None => files.push(arg.to_string()),
            }
        }

        let mut config = Self::new();
        for file in files {
            config.merge(Self::load(file)?);
        }
        for (key, value) in overrides {
            info!(event = "config_override", key = %key, value = %value);
            config.set(&key, &value)?;
        }
        Ok(config)
    }

    fn from_value(root: Value) -> Result<Self, ConfigError> {
        match root {
            Value::Null => Ok(Self::new()),
            Value::Mapping(_) => Ok(Self { root }),
            other => Err(ConfigError::Invalid(format!(
                "top level must be a mapping, found {}",
                type_name(&other)
            ))),
        }
    }

    /// Deep-merges `other` over this configuration.
    ///
    /// Mappings merge key by key; any other value in `other` replaces ours.
    pub fn merge(&mut self, other: Configuration) {
        merge_values(&mut self.root, other.root);
    }

    /// Sets a property from its textual form.
    ///
    /// The value is read as a YAML scalar, so `10` becomes a number and
    /// `true` a boolean. Missing intermediate nodes are created.
    pub fn set(&mut self, path: &str, raw: &str) -> Result<(), ConfigError> {
        let value = match serde_yaml::from_str::<Value>(raw) {
            Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
            _ => Value::String(raw.to_string()),
        };
        self.set_value(path, value)
    }

    /// Sets a property, creating missing intermediate nodes.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<(), ConfigError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: path.to_string(),
                reason: "empty path segment".to_string(),
            });
        }

        insert_at(&mut self.root, &segments, value);
        Ok(())
    }

    /// Returns the raw value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// True when `path` resolves to a non-null value.
    pub fn contains(&self, path: &str) -> bool {
        !matches!(self.get(path), None | Some(Value::Null))
    }

    /// Returns the typed value at `path`, or `None` if absent.
    pub fn get_opt<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ConfigError> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: path.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Returns the typed value at `path`, or `default` if absent.
    pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get_opt(path)?.unwrap_or(default))
    }

    /// Returns the typed value at `path`; absence is an error.
    pub fn require<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        self.get_opt(path)?
            .ok_or_else(|| ConfigError::MissingKey(path.to_string()))
    }

    /// Returns the mapping at `path`, if there is one.
    pub fn section(&self, path: &str) -> Option<&Mapping> {
        self.get(path)?.as_mapping()
    }

    /// Returns the string keys of the mapping at `path`, in document order.
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.section(path)
            .map(|m| {
                m.keys()
                    .filter_map(|k| match k {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// Non-mapping nodes along the path are replaced by mappings.
fn insert_at(node: &mut Value, segments: &[&str], value: Value) {
    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = node {
        match segments {
            [] => {}
            [last] => {
                map.insert(Value::String(last.to_string()), value);
            }
            [first, rest @ ..] => {
                let child = map
                    .entry(Value::String(first.to_string()))
                    .or_insert(Value::Null);
                insert_at(child, rest, value);
            }
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, Value::Null) if !base.is_null() => {}
        (base, overlay) => *base = overlay,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Typed view of the properties the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineSettings {
    /// Target number of leaf index combinations per partition task.
    pub partition_volume: u64,

    /// Size K of every best-K ranking.
    pub results_size: usize,

    /// Worker pool size; `None` lets rayon decide.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl EngineSettings {
    pub const PARTITION_SIZE_KEY: &'static str = "partition-size";
    pub const RESULTS_SIZE_KEY: &'static str = "results-size";
    pub const WORKER_THREADS_KEY: &'static str = "worker-threads";

    /// Creates settings directly.
    pub fn new(partition_volume: u64, results_size: usize) -> Self {
        Self {
            partition_volume,
            results_size,
            worker_threads: None,
        }
    }

    /// Sets the worker pool size.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Reads settings from configuration.
    ///
    /// # Errors
    ///
    /// `partition-size` and `results-size` are required; `results-size` and
    /// `worker-threads` must be positive.
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigError> {
        let settings = Self {
            partition_volume: config.require(Self::PARTITION_SIZE_KEY)?,
            results_size: config.require(Self::RESULTS_SIZE_KEY)?,
            worker_threads: config.get_opt(Self::WORKER_THREADS_KEY)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.results_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: Self::RESULTS_SIZE_KEY.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: Self::WORKER_THREADS_KEY.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
