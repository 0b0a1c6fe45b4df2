use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::SessionStoreConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Holds the single session token for this profile.
///
/// Reads never fail: a missing key is a normal "no session" result and
/// unreadable storage is reported the same way. Writes are last-write-wins.
pub trait SessionStore: Send + Sync {
    fn name(&self) -> &str;
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), StoreError>;
    /// Removes the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Creates a concrete store implementation based on the SessionStoreConfig.
pub fn create_store(config: &SessionStoreConfig) -> Arc<dyn SessionStore> {
    match config {
        SessionStoreConfig::Memory => {
            info!("Using in-memory session store.");
            Arc::new(MemoryStore::new())
        }
        SessionStoreConfig::File(file_config) => {
            info!(
                "Using file session store at '{}' (key '{}').",
                file_config.path.display(),
                file_config.key
            );
            Arc::new(FileStore::new(&file_config.path, &file_config.key))
        }
    }
}
