//! Per-kind routing of table operations.

use std::collections::HashMap;
use std::sync::Arc;

use teamforge_config::Configuration;
use teamforge_core::Table;
use tracing::{debug, info};

use crate::configuration::ConfigurationStore;
use crate::error::StoreError;
use crate::file::FileStore;
use crate::kind::{DataKind, StoreKind};
use crate::memory::MemoryStore;
use crate::sheets::SheetsStore;
use crate::TableStore;

/// Routes each data kind to the backend configured for it.
///
/// One instance of each backend is shared by every kind routed to it, so
/// two kinds stored in memory see the same map.
#[derive(Clone)]
pub struct StoreRouter {
    routes: HashMap<DataKind, Arc<dyn TableStore>>,
}

impl StoreRouter {
    /// Builds the router from `store.<data-kind>` keys; unset kinds use memory.
    pub fn from_config(config: &Configuration) -> Result<Self, StoreError> {
        let mut backends: HashMap<StoreKind, Arc<dyn TableStore>> = HashMap::new();
        let mut routes = HashMap::new();

        for kind in DataKind::ALL {
            let name: String =
                config.get_or(&format!("store.{}", kind), StoreKind::default().to_string())?;
            let store_kind: StoreKind = name.parse()?;
            let backend = match backends.get(&store_kind) {
                Some(backend) => Arc::clone(backend),
                None => {
                    let backend = create(store_kind, config)?;
                    backends.insert(store_kind, Arc::clone(&backend));
                    backend
                }
            };
            routes.insert(kind, backend);
        }
        Ok(Self { routes })
    }

    /// Every kind in one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        let memory: Arc<dyn TableStore> = Arc::new(MemoryStore::new());
        Self {
            routes: DataKind::ALL
                .into_iter()
                .map(|kind| (kind, Arc::clone(&memory)))
                .collect(),
        }
    }

    /// Replaces the backend of one kind.
    pub fn with_route(mut self, kind: DataKind, store: Arc<dyn TableStore>) -> Self {
        self.routes.insert(kind, store);
        self
    }

    /// Backend serving `kind`.
    pub fn backend(&self, kind: DataKind) -> Result<&dyn TableStore, StoreError> {
        self.routes
            .get(&kind)
            .map(|store| store.as_ref())
            .ok_or_else(|| StoreError::unsupported("router", format!("Data type {}", kind)))
    }
}

fn create(kind: StoreKind, config: &Configuration) -> Result<Arc<dyn TableStore>, StoreError> {
    let store: Arc<dyn TableStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => Arc::new(FileStore::from_config(config)?),
        StoreKind::GoogleSheets => Arc::new(SheetsStore::from_config(config)?),
        StoreKind::Configuration => Arc::new(ConfigurationStore::new(config)),
    };
    Ok(store)
}

impl TableStore for StoreRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError> {
        let backend = self.backend(kind)?;
        let table = backend.read(kind, key)?;
        info!(
            event = "store_read",
            kind = %kind,
            key = key.unwrap_or(""),
            rows = table.len(),
            backend = backend.name(),
            "Read {} rows of {} data via {} store",
            table.len(),
            kind,
            backend.name(),
        );
        Ok(table)
    }

    fn write(&self, kind: DataKind, key: Option<&str>, table: &Table) -> Result<(), StoreError> {
        let backend = self.backend(kind)?;
        backend.write(kind, key, table)?;
        info!(
            event = "store_write",
            kind = %kind,
            key = key.unwrap_or(""),
            rows = table.len(),
            backend = backend.name(),
            "Written {} rows of {} data via {} store",
            table.len(),
            kind,
            backend.name(),
        );
        Ok(())
    }

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        self.backend(kind)?.contains(kind, key)
    }

    fn remove(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        let backend = self.backend(kind)?;
        let removed = backend.remove(kind, key)?;
        if removed {
            debug!(
                event = "store_remove",
                kind = %kind,
                key = key.unwrap_or(""),
                backend = backend.name(),
            );
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for StoreRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for kind in DataKind::ALL {
            if let Some(store) = self.routes.get(&kind) {
                map.entry(&kind.as_str(), &store.name());
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_core::ErrorKind;
    use teamforge_test::test_configuration;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_memory() {
        let router = StoreRouter::from_config(&Configuration::new()).unwrap();
        for kind in DataKind::ALL {
            assert_eq!(router.backend(kind).unwrap().name(), "memory");
        }
    }

    #[test]
    fn test_shared_backend_instance() {
        let router = StoreRouter::from_config(&Configuration::new()).unwrap();
        router
            .write(DataKind::Partition, Some("m.0"), &Table::new(["1"]))
            .unwrap();
        // Same MemoryStore, different location.
        assert!(!router.contains(DataKind::PartitionResult, Some("m.0")).unwrap());
        assert!(router.contains(DataKind::Partition, Some("m.0")).unwrap());
    }

    #[test]
    fn test_mixed_backends() {
        let dir = TempDir::new().unwrap();
        let mut config = test_configuration(1728, 10);
        config.set("store.result", "file").unwrap();
        config
            .set("file.directory", dir.path().to_str().unwrap())
            .unwrap();
        let router = StoreRouter::from_config(&config).unwrap();

        assert_eq!(router.backend(DataKind::Evaluation).unwrap().name(), "configuration");
        assert_eq!(router.backend(DataKind::Result).unwrap().name(), "file");
        assert_eq!(router.backend(DataKind::Partition).unwrap().name(), "memory");

        let evaluation = router.read(DataKind::Evaluation, None).unwrap();
        assert_eq!(evaluation.len(), 1);

        router.write(DataKind::Result, Some("m"), &Table::new(["1"])).unwrap();
        assert!(dir.path().join("result.m.json").is_file());
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = Configuration::new();
        config.set("store.partition", "localcsvfile").unwrap();
        let err = StoreRouter::from_config(&config).unwrap_err();
        assert!(matches!(err, StoreError::UnknownStore(ref name) if name == "localcsvfile"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_injected_route() {
        let custom: Arc<dyn TableStore> = Arc::new(MemoryStore::new());
        custom
            .write(DataKind::Result, Some("m"), &Table::new(["x"]))
            .unwrap();
        let router = StoreRouter::in_memory().with_route(DataKind::Result, custom);
        assert_eq!(router.read(DataKind::Result, Some("m")).unwrap().columns(), ["x"]);
        assert!(router.read(DataKind::Partition, Some("m")).unwrap().is_blank());
    }

    #[test]
    fn test_remove_unsupported_on_read_only_backend() {
        let router = StoreRouter::from_config(&test_configuration(1728, 10)).unwrap();
        let err = router.remove(DataKind::Evaluation, None).unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { store: "configuration", .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!router.remove(DataKind::Partition, Some("m.0")).unwrap());
    }
}
