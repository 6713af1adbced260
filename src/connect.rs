//! Completion of the payment-provider account-linking redirect.
//!
//! The provider sends the visitor back to [`CALLBACK_PATH`] with an
//! authorization `code` in the query. The flow exchanges it exactly once and
//! then decides where the visitor goes next.

use std::sync::{Arc, OnceLock};

use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::SessionApi;
use crate::models::Viewer;
use crate::session::ViewerStore;
use crate::utils::{parse_query_param, with_query_flag};

pub const CALLBACK_PATH: &str = "/stripe";
pub const LOGIN_PATH: &str = "/login";
pub const CODE_PARAM: &str = "code";
/// Query flag added to the profile route when linking failed.
pub const STRIPE_ERROR_FLAG: &str = "stripe_error";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectState {
    #[default]
    Idle,
    Loading,
    /// Terminal. The flow settled and the visitor must go to this location.
    Redirect(String),
}

/// What the callback view shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", content = "to", rename_all = "snake_case")]
pub enum ConnectView {
    Nothing,
    Loading,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    fn wallet_connected() -> Self {
        Self {
            title: "You've successfully connected your Stripe account".to_string(),
            description: "You can now begin to create listings".to_string(),
        }
    }
}

pub struct ConnectProviderFlow {
    api: Arc<dyn SessionApi>,
    viewer: ViewerStore,
    state: watch::Sender<ConnectState>,
    notification: OnceLock<Notification>,
}

impl ConnectProviderFlow {
    pub fn new(api: Arc<dyn SessionApi>, viewer: ViewerStore) -> Self {
        let (state, _) = watch::channel(ConnectState::Idle);
        Self {
            api,
            viewer,
            state,
            notification: OnceLock::new(),
        }
    }

    pub fn state(&self) -> ConnectState {
        self.state.borrow().clone()
    }

    pub fn render(&self) -> ConnectView {
        match &*self.state.borrow() {
            ConnectState::Idle => ConnectView::Nothing,
            ConnectState::Loading => ConnectView::Loading,
            ConnectState::Redirect(to) => ConnectView::Redirect(to.clone()),
        }
    }

    pub fn redirect(&self) -> Option<String> {
        match &*self.state.borrow() {
            ConnectState::Redirect(to) => Some(to.clone()),
            _ => None,
        }
    }

    /// Success message, set once the wallet was linked.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.get()
    }

    /// Move out of `Idle`. Only the first caller wins.
    fn leave_idle(&self, next: ConnectState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == ConnectState::Idle {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// Run the flow for the callback `location` (path and query, or a full URL).
    /// Returns `false` when the flow was already mounted.
    pub async fn mount(&self, location: &str) -> bool {
        let Some(code) = parse_query_param(location, CODE_PARAM) else {
            let mounted = self.leave_idle(ConnectState::Redirect(LOGIN_PATH.to_string()));
            if mounted {
                info!(
                    event_name = "connect.code_missing",
                    event_domain = "connect",
                    "no authorization code on callback, sending visitor to login"
                );
            }
            return mounted;
        };

        if !self.leave_idle(ConnectState::Loading) {
            return false;
        }

        let target = match self.api.connect_stripe(&code).await {
            Ok(payload) => {
                let current = self.viewer.current();
                let target = profile_or_login(&current);
                self.viewer.replace(Viewer {
                    has_wallet: payload.has_wallet,
                    ..current
                });
                self.notification.get_or_init(Notification::wallet_connected);
                info!(
                    event_name = "connect.completed",
                    event_domain = "connect",
                    has_wallet = ?payload.has_wallet,
                    "payment account linked"
                );
                target
            }
            Err(err) => {
                warn!(
                    event_name = "connect.failed",
                    event_domain = "connect",
                    error = %err,
                    "payment account linking failed"
                );
                let target = profile_or_login(&self.viewer.current());
                if target == LOGIN_PATH {
                    target
                } else {
                    with_query_flag(&target, STRIPE_ERROR_FLAG)
                }
            }
        };

        self.state.send_replace(ConnectState::Redirect(target));
        true
    }

    /// Wait for the redirect decision.
    pub async fn settled(&self) -> Option<String> {
        let mut receiver = self.state.subscribe();
        let state = receiver
            .wait_for(|state| matches!(state, ConnectState::Redirect(_)))
            .await;
        match state.as_deref() {
            Ok(ConnectState::Redirect(to)) => Some(to.clone()),
            _ => None,
        }
    }
}

fn profile_or_login(viewer: &Viewer) -> String {
    viewer
        .profile_path()
        .unwrap_or_else(|| LOGIN_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockSessionApi, Outcome};
    use crate::models::ConnectStripePayload;

    fn host() -> Viewer {
        Viewer {
            id: Some("u42".to_string()),
            token: Some("tok".to_string()),
            avatar: None,
            has_wallet: Some(false),
            did_request: true,
        }
    }

    fn flow(api: Arc<MockSessionApi>, viewer: Viewer) -> (ConnectProviderFlow, ViewerStore) {
        let store = ViewerStore::with_viewer(viewer);
        (ConnectProviderFlow::new(api, store.clone()), store)
    }

    #[tokio::test]
    async fn renders_nothing_before_mount() {
        let (flow, _) = flow(Arc::new(MockSessionApi::logged_in(host())), host());
        assert_eq!(flow.state(), ConnectState::Idle);
        assert_eq!(flow.render(), ConnectView::Nothing);
        assert_eq!(flow.redirect(), None);
    }

    #[tokio::test]
    async fn missing_code_goes_to_login_without_a_call() {
        let api = Arc::new(MockSessionApi::logged_in(host()));
        let (flow, store) = flow(api.clone(), host());

        assert!(flow.mount("/stripe").await);

        assert!(api.connect_codes().is_empty());
        assert_eq!(flow.render(), ConnectView::Redirect("/login".to_string()));
        assert_eq!(store.current(), host());
    }

    #[tokio::test]
    async fn code_links_wallet_and_redirects_to_profile() {
        let api = Arc::new(MockSessionApi::logged_in(host()));
        let (flow, store) = flow(api.clone(), host());

        flow.mount("/stripe?code=ABC123").await;

        assert_eq!(api.connect_codes(), vec!["ABC123".to_string()]);
        assert_eq!(flow.redirect().as_deref(), Some("/user/u42"));
        let current = store.current();
        assert_eq!(current.has_wallet, Some(true));
        assert_eq!(current.id.as_deref(), Some("u42"));
        assert_eq!(current.token.as_deref(), Some("tok"));
        assert_eq!(
            flow.notification().map(|n| n.title.as_str()),
            Some("You've successfully connected your Stripe account")
        );
    }

    #[tokio::test]
    async fn failure_redirects_with_error_flag_and_leaves_wallet() {
        let api = Arc::new(MockSessionApi::new(Outcome::Ok(None), Outcome::ServerError));
        let (flow, store) = flow(api, host());

        flow.mount("https://app.example.com/stripe?code=ABC123").await;

        assert_eq!(
            flow.redirect().as_deref(),
            Some("/user/u42?stripe_error=true")
        );
        assert_eq!(store.current().has_wallet, Some(false));
        assert!(flow.notification().is_none());
    }

    #[tokio::test]
    async fn mounts_only_once() {
        let api = Arc::new(MockSessionApi::logged_in(host()));
        let (flow, _) = flow(api.clone(), host());

        assert!(flow.mount("/stripe?code=ABC123").await);
        assert!(!flow.mount("/stripe?code=ABC123").await);
        assert!(!flow.mount("/stripe").await);

        assert_eq!(api.connect_codes().len(), 1);
        assert_eq!(flow.redirect().as_deref(), Some("/user/u42"));
    }

    #[tokio::test]
    async fn shows_loading_while_the_call_is_pending() {
        let api = Arc::new(MockSessionApi::logged_in(host()).gated());
        let (flow, _) = flow(api.clone(), host());
        let flow = Arc::new(flow);

        let mounted = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.mount("/stripe?code=XYZ").await })
        };
        while api.connect_codes().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(flow.render(), ConnectView::Loading);

        api.release();
        assert_eq!(flow.settled().await.as_deref(), Some("/user/u42"));
        assert!(mounted.await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_viewer_is_sent_to_login_after_the_call() {
        let api = Arc::new(MockSessionApi::new(
            Outcome::Ok(None),
            Outcome::Ok(ConnectStripePayload {
                has_wallet: Some(true),
            }),
        ));
        let (flow, _) = flow(api.clone(), Viewer::anonymous());

        flow.mount("/stripe?code=ABC123").await;
        assert_eq!(api.connect_codes().len(), 1);
        assert_eq!(flow.redirect().as_deref(), Some("/login"));
    }
}
