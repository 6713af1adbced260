//! GraphQL client that authenticates every request with the session token.
//!
//! The token is read from the token store when each request is sent, never
//! cached at construction, so a token written mid-session is picked up by the
//! next request. A missing token is sent as an empty header value.

use std::sync::Arc;

use http::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::store::TokenStore;

/// A named GraphQL document.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V: ?Sized> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a V>,
}

#[derive(Deserialize)]
struct GraphQlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    token_header: HeaderName,
    token_store: Arc<dyn TokenStore>,
}

impl GraphQlClient {
    pub fn new(config: &ApiConfig, token_store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), config, token_store)
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        config: &ApiConfig,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let token_header = HeaderName::from_bytes(config.token_header.as_bytes()).map_err(|_| {
            ApiError::InvalidConfig(format!("bad token header '{}'", config.token_header))
        })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token_header,
            token_store,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Header value for the next request, read from the token store right now.
    /// Never fails: storage errors and unusable tokens fall back to an empty value.
    pub async fn session_header(&self) -> HeaderValue {
        let token = match self.token_store.read().await {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                warn!(
                    event_name = "api.token.read_failed",
                    event_domain = "api",
                    store = self.token_store.name(),
                    error = %e,
                    "could not read session token; sending request without one"
                );
                String::new()
            }
        };

        HeaderValue::from_str(&token).unwrap_or_else(|_| {
            warn!(
                event_name = "api.token.invalid_header",
                event_domain = "api",
                "stored session token is not a valid header value; sending an empty one"
            );
            HeaderValue::from_static("")
        })
    }

    /// Send `operation` to the endpoint and return its `data`.
    ///
    /// GraphQL `errors` in an otherwise successful response fail the operation.
    pub async fn execute<V, D>(&self, operation: &Operation, variables: Option<&V>) -> Result<D, ApiError>
    where
        V: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let session_header = self.session_header().await;
        debug!(
            event_name = "api.request",
            event_domain = "api",
            operation = operation.name,
            has_token = !session_header.is_empty(),
            "sending API operation"
        );

        let body = GraphQlRequest {
            query: operation.document,
            operation_name: operation.name,
            variables,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(self.token_header.clone(), session_header)
            .json(&body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status { status, body: text });
        }

        let envelope: GraphQlResponse<D> =
            serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                operation: operation.name,
                source,
            })?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl {
                operation: operation.name,
                message,
            });
        }

        envelope.data.ok_or(ApiError::MissingData {
            operation: operation.name,
        })
    }
}
