//! Data kinds and backend kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// The kinds of table exchanged between engine stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataKind {
    /// Scoring model definitions, one row per model.
    Evaluation,
    /// Enriched candidate roster, keyed by model name.
    EnrichedLibrary,
    /// Partition descriptor, keyed by task name.
    Partition,
    /// Best-K list of one partition, keyed by task name.
    PartitionResult,
    /// Global best-K list, keyed by model name.
    Result,
}

impl DataKind {
    pub const ALL: [DataKind; 5] = [
        DataKind::Evaluation,
        DataKind::EnrichedLibrary,
        DataKind::Partition,
        DataKind::PartitionResult,
        DataKind::Result,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Evaluation => "evaluation",
            DataKind::EnrichedLibrary => "enriched-library",
            DataKind::Partition => "partition",
            DataKind::PartitionResult => "partition-result",
            DataKind::Result => "result",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| StoreError::Malformed {
                store: "router",
                reason: format!("unknown data kind '{}'", s),
            })
    }
}

/// Storage backends selectable through `store.<data-kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    File,
    GoogleSheets,
    Configuration,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::File => "file",
            StoreKind::GoogleSheets => "googlesheets",
            StoreKind::Configuration => "configuration",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "googlesheets" => Ok(StoreKind::GoogleSheets),
            "configuration" => Ok(StoreKind::Configuration),
            other => Err(StoreError::UnknownStore(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_core::ErrorKind;

    #[test]
    fn test_data_kind_names() {
        for kind in DataKind::ALL {
            assert_eq!(kind.as_str().parse::<DataKind>().unwrap(), kind);
        }
        assert_eq!(DataKind::PartitionResult.to_string(), "partition-result");
        assert!("cache".parse::<DataKind>().is_err());
    }

    #[test]
    fn test_store_kind_lookup() {
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert_eq!("googlesheets".parse::<StoreKind>().unwrap(), StoreKind::GoogleSheets);
        let err = "localcsvfile".parse::<StoreKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Unknown store type 'localcsvfile'");
    }
}
