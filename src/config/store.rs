use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the storage slot holding the session token.
pub const DEFAULT_TOKEN_SLOT: &str = "token";

fn default_enabled() -> bool {
    true
}

fn default_slot() -> String {
    DEFAULT_TOKEN_SLOT.to_string()
}

/// Configuration of the session-token store:
/// - enabled: if false, tokens are never kept (NoStore).
/// - type: which session-scoped backend holds the token.
/// - path: directory of the `session_file` backend; defaults to the session runtime dir.
/// - slot: name of the single slot the token lives in.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct TokenStoreConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub backend: TokenStoreBackend,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_slot")]
    pub slot: String,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: TokenStoreBackend::default(),
            path: None,
            slot: default_slot(),
        }
    }
}

/// The available backends, selected via the "type" key in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenStoreBackend {
    /// Lives as long as the process. Mostly useful in tests.
    Memory,
    /// One file in the login session's runtime directory, so the token
    /// survives reloads within the session.
    #[default]
    SessionFile,
}
