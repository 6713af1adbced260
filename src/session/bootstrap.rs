use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::ViewerStore;
use crate::api::{ApiError, SessionApi};
use crate::models::Viewer;
use crate::store::TokenStore;

/// Lifecycle of the session-resume call. Moves forward only.
#[derive(Debug, Clone, Default)]
pub enum BootstrapState {
    #[default]
    NotStarted,
    InFlight,
    Settled {
        /// Set when the resume call failed; drives the error banner.
        error: Option<Arc<ApiError>>,
    },
}

impl BootstrapState {
    pub fn is_settled(&self) -> bool {
        matches!(self, BootstrapState::Settled { .. })
    }
}

/// Runs the logIn call once per application load and publishes its outcome
/// to the viewer store and the token store.
pub struct AuthBootstrap {
    api: Arc<dyn SessionApi>,
    viewer: ViewerStore,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<BootstrapState>,
}

impl AuthBootstrap {
    pub fn new(api: Arc<dyn SessionApi>, viewer: ViewerStore, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(BootstrapState::NotStarted);
        Self {
            api,
            viewer,
            tokens,
            state,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().is_settled()
    }

    /// The resume error, once settled with one.
    pub fn error(&self) -> Option<Arc<ApiError>> {
        match &*self.state.borrow() {
            BootstrapState::Settled { error } => error.clone(),
            _ => None,
        }
    }

    /// Claim the single resume attempt. Only the first caller gets `true`.
    fn begin(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            BootstrapState::NotStarted => {
                *state = BootstrapState::InFlight;
                true
            }
            _ => false,
        })
    }

    /// Fire the resume call in the background. Returns `false` when an
    /// attempt was already started.
    pub fn start(self: &Arc<Self>) -> bool {
        if !self.begin() {
            return false;
        }
        let bootstrap = Arc::clone(self);
        tokio::spawn(async move {
            bootstrap.finish().await;
        });
        true
    }

    /// Run the resume call on the current task. Returns `false` when an
    /// attempt was already started elsewhere.
    pub async fn run(&self) -> bool {
        if !self.begin() {
            return false;
        }
        self.finish().await;
        true
    }

    /// Wait until the attempt settled and return its error, if any.
    pub async fn settled(&self) -> Option<Arc<ApiError>> {
        let mut receiver = self.state.subscribe();
        let settled = receiver.wait_for(BootstrapState::is_settled).await;
        match settled.as_deref() {
            Ok(BootstrapState::Settled { error }) => error.clone(),
            _ => None,
        }
    }

    async fn finish(&self) {
        let error = self.resume().await.err().map(Arc::new);
        self.state.send_replace(BootstrapState::Settled { error });
    }

    async fn resume(&self) -> Result<(), ApiError> {
        match self.api.log_in().await {
            Ok(Some(viewer)) => {
                match viewer.session_token() {
                    Some(token) => self.persist_token(token).await,
                    None => self.clear_token().await,
                }
                info!(
                    event_name = "session.resume.completed",
                    event_domain = "session",
                    authenticated = viewer.is_authenticated(),
                    "session resume completed"
                );
                self.viewer.replace(Viewer {
                    did_request: true,
                    ..viewer
                });
                Ok(())
            }
            Ok(None) => {
                self.clear_token().await;
                info!(
                    event_name = "session.resume.completed",
                    event_domain = "session",
                    authenticated = false,
                    "session resume returned no viewer"
                );
                self.viewer.replace(Viewer {
                    did_request: true,
                    ..Viewer::anonymous()
                });
                Ok(())
            }
            Err(err) => {
                error!(
                    event_name = "session.resume.failed",
                    event_domain = "session",
                    error = %err,
                    "session resume failed"
                );
                self.viewer.replace(Viewer {
                    did_request: true,
                    ..self.viewer.current()
                });
                Err(err)
            }
        }
    }

    async fn persist_token(&self, token: &str) {
        if let Err(err) = self.tokens.write(token).await {
            warn!(
                event_name = "session.token.write_failed",
                event_domain = "session",
                store = self.tokens.name(),
                error = %err,
                "could not persist session token"
            );
        }
    }

    async fn clear_token(&self) {
        if let Err(err) = self.tokens.clear().await {
            warn!(
                event_name = "session.token.clear_failed",
                event_domain = "session",
                store = self.tokens.name(),
                error = %err,
                "could not clear session token"
            );
        }
    }
}
