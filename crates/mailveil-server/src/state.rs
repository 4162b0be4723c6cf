//! Shared application state.

use std::sync::Arc;

use mailveil_core::{MailveilConfig, Result};
use mailveil_engine::MaskingEngine;
use mailveil_store::MappingStore;

/// Shared state accessible from all route handlers.
pub struct AppState {
    pub config: MailveilConfig,
    pub engine: MaskingEngine,
    /// Unix timestamp (milliseconds).
    pub started_at: i64,
}

impl AppState {
    pub fn new(config: MailveilConfig, store: Arc<dyn MappingStore>) -> Self {
        let engine = MaskingEngine::from_config(&config, store);
        Self {
            config,
            engine,
            started_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Open the configured store and build the engine on it.
    pub fn open(config: MailveilConfig) -> Result<Self> {
        let store = mailveil_store::open_store(&config)?;
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &Arc<dyn MappingStore> {
        self.engine.store()
    }
}
