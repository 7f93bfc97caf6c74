//! Defines the HTTP routes for reading user records.
//!
//! Every route here sits behind the token-checking middleware.

use super::handlers::{get_user, list_users};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn user_router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user))
        .route_layer(middleware::from_fn(jwt_auth))
}
