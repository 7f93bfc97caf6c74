//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup, login and token
//! refresh, unwrap the request body, and hand off to `auth::service`.

use crate::api::common::{ApiError, json_payload, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::database::models::UserResponse;
use crate::state::AppState;
use axum::{
    extract::{Extension, Json, rejection::JsonRejection},
    response::Json as ResponseJson,
};

/// Handle user signup request
#[axum::debug_handler]
pub async fn signup(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<ResponseJson<SignupResponse>, ApiError> {
    let request = json_payload(payload)?;

    match AuthService::new(&state).signup(request).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ResponseJson<UserResponse>, ApiError> {
    let request = json_payload(payload)?;

    match AuthService::new(&state).login(request).await {
        Ok(user) => Ok(ResponseJson(user.into())),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(state): Extension<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<ResponseJson<RefreshTokenResponse>, ApiError> {
    let request = json_payload(payload)?;

    match AuthService::new(&state).refresh_tokens(request).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
