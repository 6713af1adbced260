//! Location-to-view mapping.
//!
//! `router` holds the generic first-match-wins table, `table` the
//! application's own routes.

pub mod router;
pub mod table;

pub use router::{RouteContext, RoutePattern, Router};
pub use table::{create_router, AppRoute};
