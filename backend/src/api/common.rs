//! Error handling utilities for API responses.
//!
//! Provides conversion between service-layer errors and HTTP responses.
//! Includes:
//! - Error response envelope
//! - ServiceError to HTTP status code mapping
//! - JSON body rejection handling
//! - Lenient query parsing for the user listing
//!
//! # Response Format
//! Successful requests return their payload as-is. All errors return
//! consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `service_error_to_http` converts to appropriate HTTP response

use crate::errors::ServiceError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Body of every failed request. Successful requests return their payload directly.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Human-readable message
    pub message: String,
    pub error: ErrorDetails,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
}

/// `page` / `recordPerPage` query parameters.
///
/// Values are kept as raw strings so that junk falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<String>,
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
}

fn positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

impl UserListQuery {
    /// Page number, 1 when missing or invalid
    pub fn page(&self) -> u32 {
        positive(self.page.as_deref()).unwrap_or(1)
    }

    /// Page size, 10 when missing, invalid or below 1
    pub fn record_per_page(&self) -> u32 {
        positive(self.record_per_page.as_deref()).unwrap_or(10)
    }

    /// Index of the first record on the page
    pub fn start_index(&self) -> u64 {
        (self.page() as u64 - 1) * self.record_per_page() as u64
    }
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            message: message.into(),
            error: ErrorDetails {
                error_type: error_type.into(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    let message = error.to_string();
    let (status, error_type, message) = match error {
        ServiceError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error", message),
        ServiceError::AlreadyExists { .. } => (StatusCode::BAD_REQUEST, "already_exists", message),
        ServiceError::Authentication { .. } => {
            (StatusCode::BAD_REQUEST, "authentication_error", message)
        }
        ServiceError::MissingCredential => {
            (StatusCode::BAD_REQUEST, "missing_credential", message)
        }
        ServiceError::TokenInvalid { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_credential", message)
        }
        ServiceError::TokenExpired => (StatusCode::BAD_REQUEST, "token_expired", message),
        ServiceError::PermissionDenied { .. } => {
            (StatusCode::BAD_REQUEST, "permission_denied", message)
        }
        // Lookup misses on GET /users/{user_id} are reported as 500.
        ServiceError::NotFound { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "not_found", message),
        ServiceError::Timeout { .. } => {
            tracing::error!("{}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, "timeout", message)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::Internal { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    (status, Json(ErrorResponse::new(message, error_type)))
}

/// Unwraps a JSON body, turning syntax and type errors into validation errors.
pub fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| service_error_to_http(ServiceError::validation(rejection.body_text())))
}
