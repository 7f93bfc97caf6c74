//! Request and response payloads for the authentication endpoints.

use crate::database::models::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request payload
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        required(message = "First name is required"),
        length(min = 2, max = 100, message = "First name must be between 2-100 characters")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        length(min = 2, max = 100, message = "Last name must be between 2-100 characters")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Must be a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone is required"),
        length(min = 1, message = "Phone is required")
    )]
    pub phone: Option<String>,

    #[validate(required(message = "User type is required"))]
    pub user_type: Option<Role>,
}

/// Signup response with the new user's id and first token pair
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    pub id: String,
    pub token: String,
    pub refresh_token: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
