//! Mailveil Store: persistence for entity maps keyed by document id.

pub mod json_file;
pub mod locks;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use locks::KeyedLocks;
pub use memory::MemoryStore;
pub use sqlite::SqliteMappingStore;

use std::sync::Arc;

use mailveil_core::{DocumentId, EntityMap, MailveilConfig, Result, StoreBackend};

/// Persistence contract for entity maps.
///
/// `save` overwrites any map already stored under the id. Implementations
/// serialize writers per id, so of two concurrent saves for the same id one
/// completes fully before the other starts (last writer wins).
pub trait MappingStore: Send + Sync {
    fn save(&self, id: &DocumentId, map: &EntityMap) -> Result<()>;

    /// `Error::MappingNotFound` when nothing is stored under `id`.
    fn load(&self, id: &DocumentId) -> Result<EntityMap>;

    /// Returns whether a mapping existed.
    fn delete(&self, id: &DocumentId) -> Result<bool>;

    /// Stored ids, sorted.
    fn list_ids(&self) -> Result<Vec<DocumentId>>;

    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected in the configuration.
pub fn open_store(config: &MailveilConfig) -> Result<Arc<dyn MappingStore>> {
    let store: Arc<dyn MappingStore> = match config.store_backend {
        StoreBackend::Json => Arc::new(JsonFileStore::open(&config.data_paths.mappings)?),
        StoreBackend::Sqlite => Arc::new(SqliteMappingStore::open(&config.data_paths.database)?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!("Mapping store: {}", store.backend_name());
    Ok(store)
}
