#![allow(dead_code)]

use std::sync::Arc;

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use viewer_session::app::App;
use viewer_session::config::{config_from_figment, ConfigV1};
use viewer_session::state::AppState;

pub const TOKEN_HEADER: &str = "X-CSRF-TOKEN";

/// Inline config pointing the client at `endpoint`, with an in-memory token store.
pub fn test_config(endpoint: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
api:
  endpoint: "{endpoint}"
payments:
  publishable_key: "pk_test_integration"
token_store:
  enabled: true
  type: memory
logging:
  level: "debug"
  format: "json"
"#
    );
    config_from_figment(Figment::new().merge(Yaml::string(&yaml))).expect("test config should load")
}

pub fn build_app(config: ConfigV1) -> (App, AppState) {
    let state = AppState::from_config(Arc::new(config)).expect("state should build");
    (App::new(state.clone()), state)
}

pub fn viewer_json(id: &str, token: &str, has_wallet: bool) -> serde_json::Value {
    json!({
        "id": id,
        "token": token,
        "avatar": "https://cdn.example.com/avatar.png",
        "hasWallet": has_wallet,
        "didRequest": true
    })
}

/// `logIn` answering with `viewer` for requests carrying `token_header_value`.
pub async fn mock_log_in(
    server: &mut ServerGuard,
    token_header_value: &str,
    viewer: serde_json::Value,
) -> Mock {
    server
        .mock("POST", "/api")
        .match_header(TOKEN_HEADER, token_header_value)
        .match_body(Matcher::PartialJson(json!({ "operationName": "LogIn" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "logIn": viewer } }).to_string())
        .create_async()
        .await
}
