use http::StatusCode;
use thiserror::Error;

/// Failure of a single API operation. None of these are retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("could not decode response of '{operation}': {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("operation '{operation}' failed: {message}")]
    GraphQl {
        operation: &'static str,
        message: String,
    },
    #[error("operation '{operation}' returned no data")]
    MissingData { operation: &'static str },
    #[error("invalid API configuration: {0}")]
    InvalidConfig(String),
}
