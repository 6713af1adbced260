use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{TokenStore, TokenStoreError};

/// Keeps the token in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as after a reload within the same session.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot.read().await.clone().filter(|t| !t.is_empty()))
    }

    async fn write(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot.write().await = Some(token.to_string());
        debug!(store = "memory", "Session token written");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot.write().await = None;
        debug!(store = "memory", "Session token cleared");
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
