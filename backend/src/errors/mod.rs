//! Global application error types.
//!
//! `RepositoryError` is what the document store layer reports, `ServiceError`
//! is what services, the access guard and the authorization policy report.
//! The HTTP mapping lives in `api::common::service_error_to_http`.

use std::time::Duration;
use thiserror::Error;
use validator::ValidationErrors;

/// Generic message for every credential mismatch. Never says which half was wrong.
pub const INCORRECT_CREDENTIALS: &str = "email or password is incorrect";

/// Errors raised by user storage backends.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique index rejected the write.
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    #[error("user not found: {user_id}")]
    NotFound { user_id: String },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        match crate::repositories::user_repository::duplicate_key_field(&err) {
            Some(field) => RepositoryError::Duplicate {
                field: field.to_string(),
            },
            None => RepositoryError::Database(anyhow::Error::new(err)),
        }
    }
}

/// Service error used across signup, login, the access guard and the policy checks.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{field} already exist")]
    AlreadyExists { field: String },

    #[error("{message}")]
    Authentication { message: String },

    #[error("authorization not provided")]
    MissingCredential,

    #[error("invalid token: {message}")]
    TokenInvalid { message: String },

    #[error("token has expired")]
    TokenExpired,

    #[error("{message}")]
    PermissionDenied { message: String },

    #[error("store operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Flattens validator output into a single `field: message` list.
    pub fn from_validation(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        messages.sort();
        Self::validation(messages.join(", "))
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(field: impl Into<String>) -> Self {
        Self::AlreadyExists {
            field: field.into(),
        }
    }

    pub fn authentication() -> Self {
        Self::Authentication {
            message: INCORRECT_CREDENTIALS.to_string(),
        }
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::TokenInvalid {
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate { field } => ServiceError::already_exists(field),
            RepositoryError::NotFound { user_id } => ServiceError::not_found("User", user_id),
            RepositoryError::Database(source) => ServiceError::Database { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_matches_signup_wording() {
        let err: ServiceError = RepositoryError::Duplicate {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "email already exist");
    }

    #[test]
    fn test_authentication_error_is_generic() {
        let err = ServiceError::authentication();
        assert_eq!(err.to_string(), INCORRECT_CREDENTIALS);
        assert!(!err.to_string().contains("wrong password"));
    }

    #[test]
    fn test_repository_not_found_keeps_identifier() {
        let err: ServiceError = RepositoryError::NotFound {
            user_id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::NotFound { ref identifier, .. } if identifier == "abc"));
    }
}
