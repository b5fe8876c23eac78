//! Table stores for teamforge.
//!
//! Every stage of the engine exchanges [`Table`](teamforge_core::Table)s
//! through the [`TableStore`] trait. Which backend serves which
//! [`DataKind`] is decided once at startup by [`StoreRouter::from_config`]
//! from the `store.<data-kind>` configuration keys:
//!
//! | value | backend | reads | writes and removes |
//! |-------|---------|-------|-------------------|
//! | `memory` | [`MemoryStore`] | yes | yes |
//! | `file` | [`FileStore`] | yes | yes |
//! | `googlesheets` | [`SheetsStore`] | unkeyed only | no |
//! | `configuration` | [`ConfigurationStore`] | evaluation only | no |
//!
//! # Example
//!
//! ```
//! use teamforge_core::Table;
//! use teamforge_store::{DataKind, StoreRouter, TableStore};
//!
//! let store = StoreRouter::in_memory();
//! let table = Table::new(["1", "2", "3"]);
//! store.write(DataKind::Partition, Some("model.0"), &table).unwrap();
//!
//! assert!(store.contains(DataKind::Partition, Some("model.0")).unwrap());
//! assert!(!store.contains(DataKind::Partition, Some("model.1")).unwrap());
//! assert!(store.read(DataKind::Partition, Some("model.1")).unwrap().is_blank());
//!
//! assert!(store.remove(DataKind::Partition, Some("model.0")).unwrap());
//! assert!(!store.contains(DataKind::Partition, Some("model.0")).unwrap());
//! ```

mod configuration;
mod error;
mod file;
mod kind;
mod memory;
mod router;
mod sheets;

pub use configuration::ConfigurationStore;
pub use error::StoreError;
pub use file::FileStore;
pub use kind::{DataKind, StoreKind};
pub use memory::MemoryStore;
pub use router::StoreRouter;
pub use sheets::{SheetLocation, SheetsStore};

use teamforge_core::Table;

/// A place tables are read from and written to.
///
/// Tables are addressed by data kind plus an optional key, e.g. the
/// partition descriptor `model.3` or the roster of one model. Reading an
/// absent location yields a blank table; [`contains`](Self::contains)
/// tells absent and empty apart.
pub trait TableStore: Send + Sync {
    /// Backend name used in logs and errors.
    fn name(&self) -> &'static str;

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError>;

    fn write(&self, kind: DataKind, key: Option<&str>, table: &Table) -> Result<(), StoreError>;

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError>;

    /// Deletes a location; returns whether it existed.
    fn remove(&self, kind: DataKind, _key: Option<&str>) -> Result<bool, StoreError> {
        Err(StoreError::unsupported(self.name(), format!("Removing {} data", kind)))
    }
}

/// Flat name of a location: `<kind>` or `<kind>.<key>`.
pub(crate) fn location(kind: DataKind, key: Option<&str>) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("{}.{}", kind, key),
        _ => kind.to_string(),
    }
}
