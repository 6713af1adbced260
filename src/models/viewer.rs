use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Route prefix of a visitor's own profile page.
pub const PROFILE_ROUTE_PREFIX: &str = "/user";

/// The current visitor, authenticated or anonymous.
///
/// The wire representation uses the camelCase field names of the API
/// (`hasWallet`, `didRequest`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// `None` means anonymous.
    pub id: Option<String>,
    /// Cached copy of the session token. The token store stays authoritative
    /// for what is sent on the wire.
    pub token: Option<String>,
    pub avatar: Option<String>,
    /// `Some(true)` once the visitor linked a payment account.
    pub has_wallet: Option<bool>,
    /// Set once the session-resume attempt of this application load settled.
    #[serde(default)]
    pub did_request: bool,
}

impl Viewer {
    /// The viewer every application load starts from.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Returns the viewer's own profile route, or `None` for anonymous visitors.
    pub fn profile_path(&self) -> Option<String> {
        if !self.is_authenticated() {
            return None;
        }
        self.id
            .as_deref()
            .map(|id| format!("{}/{}", PROFILE_ROUTE_PREFIX, urlencoding::encode(id)))
    }

    /// Non-empty session token carried by this viewer, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}
