use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Header that carries the session token on every API request.
pub const DEFAULT_TOKEN_HEADER: &str = "X-CSRF-TOKEN";

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

/// Where the GraphQL API lives and how requests are authenticated.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    /// Absolute URL of the single GraphQL endpoint, e.g. `http://localhost:9000/api`.
    pub endpoint: String,
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

/// Payment-provider settings needed before any checkout UI can render.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct PaymentsConfig {
    /// Publishable (client-side) API key of the payment provider.
    #[serde(default)]
    pub publishable_key: String,
}
