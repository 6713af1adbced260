//! The application shell: gates routing on the session resume, shows the
//! sign-in error banner and drives the payment callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, warn};

use crate::connect::{ConnectProviderFlow, ConnectView, Notification};
use crate::models::Viewer;
use crate::routes::{create_router, AppRoute, Router};
use crate::session::{AuthBootstrap, ViewerStore};
use crate::state::AppState;
use crate::store::TokenStoreError;

pub const SESSION_ERROR_BANNER: &str =
    "We weren't able to verify if you were logged in. Please try again later!";
pub const LOADING_MESSAGE: &str = "Launching Tinyhouse";

/// Upper bound on redirects followed by a single visit.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// The session resume has not settled yet. No route is rendered.
    Loading { message: String },
    Routed {
        #[serde(skip_serializing_if = "Option::is_none")]
        banner: Option<String>,
        viewer: Viewer,
        route: AppRoute,
        /// State of the payment callback, on the callback route only.
        #[serde(skip_serializing_if = "Option::is_none")]
        connect: Option<ConnectView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notification: Option<Notification>,
    },
}

/// Outcome of [`App::visit`]: where the visitor ended up and what they see.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Visit {
    pub location: String,
    pub redirects: Vec<String>,
    pub screen: Screen,
}

pub struct App {
    state: AppState,
    bootstrap: Arc<AuthBootstrap>,
    connect: ConnectProviderFlow,
    router: Router<AppRoute>,
    banner_dismissed: AtomicBool,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let bootstrap = Arc::new(AuthBootstrap::new(
            state.api.clone(),
            state.viewer.clone(),
            state.token_store.clone(),
        ));
        let connect = ConnectProviderFlow::new(state.api.clone(), state.viewer.clone());
        let router = create_router(&state.config.payments);
        Self {
            state,
            bootstrap,
            connect,
            router,
            banner_dismissed: AtomicBool::new(false),
        }
    }

    pub fn viewer(&self) -> &ViewerStore {
        &self.state.viewer
    }

    pub fn bootstrap(&self) -> &AuthBootstrap {
        &self.bootstrap
    }

    pub fn connect_flow(&self) -> &ConnectProviderFlow {
        &self.connect
    }

    /// Kick off the session resume. Repeated mounts do nothing.
    pub fn mount(&self) -> bool {
        self.bootstrap.start()
    }

    /// Wait for the session resume to settle.
    pub async fn settled(&self) {
        self.bootstrap.settled().await;
    }

    pub fn dismiss_banner(&self) {
        self.banner_dismissed.store(true, Ordering::Relaxed);
    }

    pub fn render(&self, location: &str) -> Screen {
        if !self.bootstrap.is_settled() {
            return Screen::Loading {
                message: LOADING_MESSAGE.to_string(),
            };
        }

        let banner = (self.bootstrap.error().is_some()
            && !self.banner_dismissed.load(Ordering::Relaxed))
        .then(|| SESSION_ERROR_BANNER.to_string());

        let viewer = self.state.viewer.current();
        let route = self
            .router
            .resolve_with(location, viewer.clone(), &self.state.viewer);
        let (connect, notification) = match route {
            AppRoute::ConnectStripe => (
                Some(self.connect.render()),
                self.connect.notification().cloned(),
            ),
            _ => (None, None),
        };

        Screen::Routed {
            banner,
            viewer,
            route,
            connect,
            notification,
        }
    }

    /// Render `location` once the session settled, running the payment
    /// callback and following the redirects it decides on.
    pub async fn visit(&self, location: &str) -> Visit {
        self.mount();
        self.settled().await;

        let mut current = location.to_string();
        let mut redirects = Vec::new();

        loop {
            let screen = self.render(&current);
            let on_callback = matches!(
                &screen,
                Screen::Routed {
                    route: AppRoute::ConnectStripe,
                    ..
                }
            );
            if !on_callback || redirects.len() >= MAX_REDIRECTS {
                return Visit {
                    location: current,
                    redirects,
                    screen,
                };
            }

            self.connect.mount(&current).await;
            match self.connect.redirect() {
                Some(next) => {
                    debug!(
                        event_name = "app.redirect",
                        event_domain = "app",
                        from = %current,
                        to = %next,
                        "following redirect"
                    );
                    redirects.push(next.clone());
                    current = next;
                }
                None => {
                    let screen = self.render(&current);
                    return Visit {
                        location: current,
                        redirects,
                        screen,
                    };
                }
            }
        }
    }

    /// Reset the viewer and forget the session token.
    pub async fn sign_out(&self) -> Result<(), TokenStoreError> {
        self.state.viewer.replace(Viewer {
            did_request: self.state.viewer.current().did_request,
            ..Viewer::anonymous()
        });
        let cleared = self.state.token_store.clear().await;
        if let Err(err) = &cleared {
            warn!(
                event_name = "app.sign_out.clear_failed",
                event_domain = "app",
                error = %err,
                "could not clear session token on sign out"
            );
        }
        cleared
    }
}
