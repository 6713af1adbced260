use super::{TokenStore, TokenStoreError};
use async_trait::async_trait;

/// A store that never keeps a token: reads are always empty and writes
/// report that the store is disabled.
pub struct NoStore;

impl NoStore {
    pub fn new() -> Self {
        NoStore
    }
}

impl Default for NoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for NoStore {
    async fn read(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(None)
    }

    async fn write(&self, _token: &str) -> Result<(), TokenStoreError> {
        Err(TokenStoreError::Disabled)
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
