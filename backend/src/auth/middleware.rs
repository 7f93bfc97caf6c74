//! Middleware for protecting authenticated routes.
//!
//! Validates the token carried in the `Authorization` header and attaches the
//! decoded [`Claims`] to the request extensions for the handlers.

use crate::api::common::{ApiError, service_error_to_http};
use crate::errors::ServiceError;
use crate::state::AppState;
use crate::utils::jwt::TokenType;
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Reads the raw token, tolerating an optional `Bearer ` scheme prefix.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::warn!(path = %request.uri().path(), "Request without authorization header");
        return Err(service_error_to_http(ServiceError::MissingCredential));
    };

    match state.jwt.validate_token(token, TokenType::Access) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(error) => {
            tracing::warn!(path = %request.uri().path(), "Rejected token: {}", error);
            Err(service_error_to_http(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorResponse;
    use crate::config::Config;
    use crate::database::models::Role;
    use crate::repositories::memory_repository::InMemoryUserRepository;
    use crate::utils::jwt::Claims;
    use axum::{Json, Router, body::Body, http::StatusCode, middleware, routing::get};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn protected_handler(Extension(claims): Extension<Claims>) -> Json<Claims> {
        Json(claims)
    }

    fn create_test_app() -> (Router, AppState) {
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), &Config::for_tests());
        let app = Router::new()
            .route("/protected", get(protected_handler))
            .route_layer(middleware::from_fn(jwt_auth))
            .layer(Extension(state.clone()));
        (app, state)
    }

    async fn send(app: Router, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_raw_token_populates_claims() {
        let (app, state) = create_test_app();
        let pair = state
            .jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1")
            .unwrap();

        let (status, body) = send(app, Some(&pair.token)).await;
        assert_eq!(status, StatusCode::OK);
        let claims: Claims = serde_json::from_slice(&body).unwrap();
        assert_eq!(claims.uid, "u1");
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.user_type, Role::User);
    }

    #[tokio::test]
    async fn test_bearer_prefix_is_accepted() {
        let (app, state) = create_test_app();
        let pair = state
            .jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::Admin, "u1")
            .unwrap();

        let (status, _) = send(app, Some(&format!("Bearer {}", pair.token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let (app, _) = create_test_app();
        let (status, body) = send(app, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.message, "authorization not provided");
        assert_eq!(error.error.error_type, "missing_credential");
    }

    #[tokio::test]
    async fn test_invalid_token_short_circuits() {
        let (app, _) = create_test_app();
        let (status, body) = send(app, Some("garbage")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error.error_type, "invalid_credential");
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let (app, state) = create_test_app();
        let pair = state
            .jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1")
            .unwrap();

        let (status, body) = send(app, Some(&pair.refresh_token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error.error_type, "invalid_credential");
    }
}
