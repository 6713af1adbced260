use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{TokenStore, TokenStoreError};

const APP_DIR: &str = "viewer-session";

/// Stores the token in a single file inside the login session's runtime
/// directory. `$XDG_RUNTIME_DIR` is wiped when the session ends, so the token
/// survives client restarts within a session but not across sessions.
pub struct SessionFileStore {
    path: PathBuf,
}

impl SessionFileStore {
    /// `dir` holds the slot file; `slot` is its file name.
    pub fn new(dir: impl Into<PathBuf>, slot: &str) -> Result<Self, TokenStoreError> {
        let valid = !slot.is_empty()
            && slot != "."
            && slot != ".."
            && !slot.contains(['/', '\\']);
        if !valid {
            return Err(TokenStoreError::InvalidSlot(slot.to_string()));
        }
        Ok(Self {
            path: dir.into().join(slot),
        })
    }

    /// `$XDG_RUNTIME_DIR/viewer-session`, or the OS temp dir when no runtime dir is set.
    pub fn default_dir() -> PathBuf {
        std::env::var_os("XDG_RUNTIME_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for SessionFileStore {
    async fn read(&self) -> Result<Option<String>, TokenStoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token)
            .await
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| self.io_error(e))?;
        }

        debug!(store = "session_file", path = %self.path.display(), "Session token written");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(store = "session_file", path = %self.path.display(), "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn name(&self) -> &str {
        "session_file"
    }
}
