use async_trait::async_trait;
use tracing::{debug, info};

use super::client::{GraphQlClient, Operation};
use super::error::ApiError;
use crate::models::{ConnectStripeData, ConnectStripePayload, ConnectStripeVariables, LogInData, Viewer};

/// Resumes the visitor's session from the token sent with the request.
pub const LOG_IN: Operation = Operation {
    name: "LogIn",
    document: r#"mutation LogIn($input: LogInInput) {
  logIn(input: $input) {
    id
    token
    avatar
    hasWallet
    didRequest
  }
}"#,
};

/// Exchanges a payment-provider authorization code for a linked wallet.
pub const CONNECT_STRIPE: Operation = Operation {
    name: "ConnectStripe",
    document: r#"mutation ConnectStripe($input: ConnectStripeInput!) {
  connectStripe(input: $input) {
    hasWallet
  }
}"#,
};

/// The two API operations the session layer depends on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Resume the session. `Ok(None)` when the server returns no viewer.
    async fn log_in(&self) -> Result<Option<Viewer>, ApiError>;

    /// Link the visitor's payment account using the provider's authorization code.
    async fn connect_stripe(&self, code: &str) -> Result<ConnectStripePayload, ApiError>;
}

#[async_trait]
impl SessionApi for GraphQlClient {
    async fn log_in(&self) -> Result<Option<Viewer>, ApiError> {
        let data: LogInData = self.execute::<(), _>(&LOG_IN, None).await?;
        debug!(
            event_name = "api.log_in.completed",
            event_domain = "api",
            has_viewer = data.log_in.is_some(),
            "logIn completed"
        );
        Ok(data.log_in)
    }

    async fn connect_stripe(&self, code: &str) -> Result<ConnectStripePayload, ApiError> {
        let variables = ConnectStripeVariables::new(code);
        let data: ConnectStripeData = self.execute(&CONNECT_STRIPE, Some(&variables)).await?;
        let payload = data.connect_stripe.ok_or(ApiError::MissingData {
            operation: CONNECT_STRIPE.name,
        })?;
        info!(
            event_name = "api.connect_stripe.completed",
            event_domain = "api",
            has_wallet = ?payload.has_wallet,
            "connectStripe completed"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::store::MemoryTokenStore;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn client_for(server: &Server) -> GraphQlClient {
        let config = ApiConfig {
            endpoint: format!("{}/api", server.url()),
            token_header: "X-CSRF-TOKEN".to_string(),
        };
        GraphQlClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[tokio::test]
    async fn log_in_returns_the_viewer() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api")
            .match_body(Matcher::PartialJson(json!({ "operationName": "LogIn" })))
            .with_status(200)
            .with_body(
                json!({
                    "data": { "logIn": {
                        "id": "u1", "token": "t1", "avatar": null,
                        "hasWallet": false, "didRequest": true
                    }}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let viewer = client_for(&server).log_in().await.unwrap();
        m.assert_async().await;

        let viewer = viewer.expect("viewer expected");
        assert_eq!(viewer.id.as_deref(), Some("u1"));
        assert_eq!(viewer.token.as_deref(), Some("t1"));
        assert_eq!(viewer.has_wallet, Some(false));
    }

    #[tokio::test]
    async fn log_in_without_viewer_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api")
            .with_status(200)
            .with_body(r#"{"data": {"logIn": null}}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).log_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn connect_stripe_sends_the_code() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "ConnectStripe",
                "variables": { "input": { "code": "ABC123" } }
            })))
            .with_status(200)
            .with_body(r#"{"data": {"connectStripe": {"hasWallet": true}}}"#)
            .create_async()
            .await;

        let payload = client_for(&server).connect_stripe("ABC123").await.unwrap();
        m.assert_async().await;
        assert_eq!(payload.has_wallet, Some(true));
    }

    #[tokio::test]
    async fn connect_stripe_null_payload_is_an_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api")
            .with_status(200)
            .with_body(r#"{"data": {"connectStripe": null}}"#)
            .create_async()
            .await;

        let result = client_for(&server).connect_stripe("ABC123").await;
        assert!(matches!(result, Err(ApiError::MissingData { operation: "ConnectStripe" })));
    }
}
