use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::{memory_store::MemoryTokenStore, no_store::NoStore, session_file_store::SessionFileStore};
use crate::config::{TokenStoreBackend, TokenStoreConfig};

/// Errors surfaced by a token store backend.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store is disabled")]
    Disabled,
    #[error("token storage at '{path}' failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid token slot name '{0}'")]
    InvalidSlot(String),
}

/// The TokenStore trait abstracts the single session-scoped slot holding the
/// opaque session token (read, write, clear). Writes are last-write-wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current token; `None` when the slot is empty.
    async fn read(&self) -> Result<Option<String>, TokenStoreError>;
    async fn write(&self, token: &str) -> Result<(), TokenStoreError>;
    async fn clear(&self) -> Result<(), TokenStoreError>;
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool {
        // Real stores are always enabled; NoStore returns false
        // so callers can write better debug messages
        true
    }
}

/// Creates a concrete store implementation based on the TokenStoreConfig.
/// If `enabled = false`, returns NoStore. Otherwise, picks the configured backend.
pub fn create_store(config: &TokenStoreConfig) -> Result<Arc<dyn TokenStore>, TokenStoreError> {
    if !config.enabled {
        info!(
            event_name = "store.disabled",
            event_domain = "store",
            "Token store is disabled. Using NoStore."
        );
        return Ok(Arc::new(NoStore::new()));
    }

    match config.backend {
        TokenStoreBackend::Memory => {
            info!(
                event_name = "store.created",
                event_domain = "store",
                backend = "memory",
                "Using in-memory token store."
            );
            Ok(Arc::new(MemoryTokenStore::new()))
        }
        TokenStoreBackend::SessionFile => {
            let dir = config
                .path
                .clone()
                .unwrap_or_else(SessionFileStore::default_dir);
            let store = SessionFileStore::new(dir, &config.slot)?;
            info!(
                event_name = "store.created",
                event_domain = "store",
                backend = "session_file",
                path = %store.path().display(),
                "Using session file token store."
            );
            Ok(Arc::new(store))
        }
    }
}
