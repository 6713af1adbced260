use schemars::JsonSchema;
use serde::Serialize;

use super::router::{RouteContext, Router};
use crate::config::PaymentsConfig;
use crate::connect::{CALLBACK_PATH, LOGIN_PATH, STRIPE_ERROR_FLAG};
use crate::models::Viewer;

/// The view chosen for a location, with the inputs that view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AppRoute {
    Home,
    Host {
        viewer: Viewer,
    },
    Login {
        viewer: Viewer,
    },
    /// Payment-provider callback; rendering is driven by the connect flow.
    ConnectStripe,
    Listing {
        id: String,
        viewer: Viewer,
        /// Needed by the checkout UI of the listing page.
        publishable_key: String,
    },
    Listings {
        location: Option<String>,
    },
    User {
        id: String,
        viewer: Viewer,
        stripe_error: bool,
    },
    NotFound {
        path: String,
    },
}

fn required_param(ctx: &RouteContext, name: &str) -> String {
    ctx.param(name).unwrap_or_default().to_string()
}

/// The application's route table.
pub fn create_router(payments: &PaymentsConfig) -> Router<AppRoute> {
    let publishable_key = payments.publishable_key.clone();

    Router::new(|ctx: &RouteContext| AppRoute::NotFound {
        path: ctx.path.clone(),
    })
    .route("/", |_: &RouteContext| AppRoute::Home)
    .route("/host", |ctx: &RouteContext| AppRoute::Host {
        viewer: ctx.viewer.clone(),
    })
    .route(LOGIN_PATH, |ctx: &RouteContext| AppRoute::Login {
        viewer: ctx.viewer.clone(),
    })
    .route(CALLBACK_PATH, |_: &RouteContext| AppRoute::ConnectStripe)
    .route("/listing/:id", move |ctx: &RouteContext| AppRoute::Listing {
        id: required_param(ctx, "id"),
        viewer: ctx.viewer.clone(),
        publishable_key: publishable_key.clone(),
    })
    .route("/listings/:location?", |ctx: &RouteContext| {
        AppRoute::Listings {
            location: ctx.param("location").map(str::to_string),
        }
    })
    .route("/user/:id", |ctx: &RouteContext| AppRoute::User {
        id: required_param(ctx, "id"),
        viewer: ctx.viewer.clone(),
        stripe_error: ctx.query_param(STRIPE_ERROR_FLAG).as_deref() == Some("true"),
    })
}
