//! Library exports for viewer-session, shared between the binary and tests.

pub mod api;
pub mod app;
pub mod config;
pub mod connect;
pub mod models;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
