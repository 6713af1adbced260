pub mod client;
pub mod error;
#[cfg(test)]
pub mod mock;
pub mod operations;

pub use client::{GraphQlClient, Operation};
pub use error::ApiError;
pub use operations::{SessionApi, CONNECT_STRIPE, LOG_IN};
