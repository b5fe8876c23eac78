//! In-memory table store.

use std::collections::HashMap;

use parking_lot::RwLock;
use teamforge_core::Table;

use crate::error::StoreError;
use crate::kind::DataKind;
use crate::{location, TableStore};

/// Tables held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored locations.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

impl TableStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError> {
        Ok(self
            .tables
            .read()
            .get(&location(kind, key))
            .cloned()
            .unwrap_or_default())
    }

    fn write(&self, kind: DataKind, key: Option<&str>, table: &Table) -> Result<(), StoreError> {
        self.tables
            .write()
            .insert(location(kind, key), table.clone());
        Ok(())
    }

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        Ok(self.tables.read().contains_key(&location(kind, key)))
    }

    fn remove(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        Ok(self.tables.write().remove(&location(kind, key)).is_some())
    }
}
