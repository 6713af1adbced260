//! Shared application state.
//!
//! Everything one application load needs, built once from the configuration
//! and handed to the [`App`](crate::app::App).

use std::sync::Arc;

use crate::api::{GraphQlClient, SessionApi};
use crate::config::ConfigV1;
use crate::session::ViewerStore;
use crate::startup::StartupError;
use crate::store::{create_store, TokenStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigV1>,
    /// Authoritative holder of the session token.
    pub token_store: Arc<dyn TokenStore>,
    pub api: Arc<dyn SessionApi>,
    pub viewer: ViewerStore,
}

impl AppState {
    /// Validate the configuration and wire the token store into the API client.
    pub fn from_config(config: Arc<ConfigV1>) -> Result<Self, StartupError> {
        config.validate()?;
        let token_store = create_store(&config.token_store)?;
        let api = GraphQlClient::new(&config.api, token_store.clone())?;

        Ok(Self {
            config,
            token_store,
            api: Arc::new(api),
            viewer: ViewerStore::new(),
        })
    }
}
