//! Scripted `SessionApi` for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use tokio::sync::Notify;

use super::{ApiError, SessionApi};
use crate::models::{ConnectStripePayload, Viewer};

/// Scripted outcome of a mocked operation.
#[derive(Clone)]
pub enum Outcome<T> {
    Ok(T),
    /// Fails with an HTTP 500.
    ServerError,
}

impl<T: Clone> Outcome<T> {
    fn resolve(&self) -> Result<T, ApiError> {
        match self {
            Outcome::Ok(value) => Ok(value.clone()),
            Outcome::ServerError => Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "Internal Server Error".to_string(),
            }),
        }
    }
}

/// Counts calls and answers with scripted outcomes. An optional gate holds
/// every call in flight until `release` is called.
pub struct MockSessionApi {
    log_in: Outcome<Option<Viewer>>,
    connect: Outcome<ConnectStripePayload>,
    log_in_calls: AtomicUsize,
    connect_codes: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockSessionApi {
    pub fn new(log_in: Outcome<Option<Viewer>>, connect: Outcome<ConnectStripePayload>) -> Self {
        Self {
            log_in,
            connect,
            log_in_calls: AtomicUsize::new(0),
            connect_codes: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn logged_in(viewer: Viewer) -> Self {
        Self::new(
            Outcome::Ok(Some(viewer)),
            Outcome::Ok(ConnectStripePayload {
                has_wallet: Some(true),
            }),
        )
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let the held call (or the next one) complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn log_in_calls(&self) -> usize {
        self.log_in_calls.load(Ordering::SeqCst)
    }

    pub fn connect_codes(&self) -> Vec<String> {
        self.connect_codes.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn log_in(&self) -> Result<Option<Viewer>, ApiError> {
        self.log_in_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.log_in.resolve()
    }

    async fn connect_stripe(&self, code: &str) -> Result<ConnectStripePayload, ApiError> {
        self.connect_codes.lock().unwrap().push(code.to_string());
        self.wait_for_gate().await;
        self.connect.resolve()
    }
}
