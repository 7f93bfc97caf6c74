//! Central module for organizing the application's API endpoints.
//!
//! `build_router` assembles the public auth routes, the guarded user routes,
//! the guarded access-check routes and the service banner, and injects the
//! shared [`AppState`].

pub mod common;
pub mod user;

use crate::auth::middleware::jwt_auth;
use crate::auth::routes::auth_router;
use crate::state::AppState;
use axum::{Extension, Router, middleware, response::Json, routing::get};
use serde_json::{Value, json};

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/ping", get(ping))
        .merge(auth_router())
        .merge(user::routes::user_router())
        .merge(access_check_router())
        .layer(Extension(state))
}

/// Routes that only answer when the caller holds a valid access token.
fn access_check_router() -> Router {
    Router::new()
        .route("/api-1", get(|| access_granted("api 1")))
        .route("/api-2", get(|| access_granted("api 2")))
        .route_layer(middleware::from_fn(jwt_auth))
}

async fn access_granted(api: &'static str) -> Json<Value> {
    Json(json!({ "success": format!("Access Granted for {}", api) }))
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "Userbase Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to Userbase API"
    }))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}
