//! Application startup.
//!
//! Builds the state from a validated configuration, mounts the app and
//! visits the requested location.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::api::ApiError;
use crate::app::{App, Visit};
use crate::config::{ConfigError, ConfigV1};
use crate::state::AppState;
use crate::store::TokenStoreError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not open token store: {0}")]
    TokenStore(#[from] TokenStoreError),
    #[error("could not build API client: {0}")]
    Api(#[from] ApiError),
    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Start one application load and visit `location`, following redirects.
///
/// # Errors
///
/// Fails when the configuration is unusable (for example without a
/// publishable payment key) or the token store cannot be opened. Session
/// resume failures are not errors; they surface as a banner on the screen.
pub async fn run(config: Arc<ConfigV1>, location: &str) -> Result<Visit, StartupError> {
    let state = AppState::from_config(config.clone())?;

    info!(
        event_name = "startup.begin",
        event_domain = "startup",
        endpoint = %config.api.endpoint,
        token_store = state.token_store.name(),
        token_store_enabled = state.token_store.is_enabled(),
        "starting viewer session"
    );

    let app = App::new(state);
    app.mount();
    let visit = app.visit(location).await;

    info!(
        event_name = "startup.visited",
        event_domain = "startup",
        location = %visit.location,
        "visit finished"
    );
    Ok(visit)
}
