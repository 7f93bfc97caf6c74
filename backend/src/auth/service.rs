//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::database::models::{NewUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::services::with_deadline;
use crate::state::AppState;
use crate::utils::jwt::{TokenPair, TokenType};
use chrono::Utc;
use validator::Validate;

/// Authentication service for handling signup, login and token rotation
pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(state: &'a AppState) -> Self {
        AuthService { state }
    }

    /// Register a user and issue their first token pair.
    ///
    /// The count checks only give a friendlier early error; the store's unique
    /// indexes decide, and an insert rejected by them surfaces as the same
    /// `AlreadyExists` error.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<SignupResponse> {
        request.validate().map_err(ServiceError::from_validation)?;

        let (
            Some(first_name),
            Some(last_name),
            Some(password),
            Some(email),
            Some(phone),
            Some(user_type),
        ) = (
            request.first_name,
            request.last_name,
            request.password,
            request.email,
            request.phone,
            request.user_type,
        )
        else {
            return Err(ServiceError::validation("missing required fields"));
        };

        let timeout = self.state.store_timeout;
        let users = &self.state.users;

        if with_deadline(timeout, users.count_by_email(&email)).await? > 0 {
            return Err(ServiceError::already_exists("email"));
        }

        let password_hash = self.state.hasher.hash(&password).await?;

        if with_deadline(timeout, users.count_by_phone(&phone)).await? > 0 {
            return Err(ServiceError::already_exists("phone"));
        }

        let mut user = User::new(NewUser {
            first_name,
            last_name,
            password_hash,
            email,
            phone,
            user_type,
        });

        let TokenPair {
            token,
            refresh_token,
        } = self.state.jwt.tokens_for(&user)?;
        user.token = Some(token.clone());
        user.refresh_token = Some(refresh_token.clone());

        with_deadline(timeout, users.insert(&user)).await?;

        tracing::info!(user_id = %user.user_id, role = %user.user_type, "User signed up");

        Ok(SignupResponse {
            success: true,
            id: user.user_id,
            token,
            refresh_token,
        })
    }

    /// Authenticate a user, rotate their stored tokens and return the fresh record.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<User> {
        request.validate().map_err(ServiceError::from_validation)?;
        let (Some(email), Some(password)) = (request.email, request.password) else {
            return Err(ServiceError::validation("missing required fields"));
        };

        let timeout = self.state.store_timeout;

        let found = with_deadline(timeout, self.state.users.find_by_email(&email))
            .await?
            .ok_or_else(ServiceError::authentication)?;

        self.state.hasher.verify(&found.password, &password).await?;

        let pair = self.state.jwt.tokens_for(&found)?;
        self.update_all_tokens(&found.user_id, &pair.token, &pair.refresh_token)
            .await?;

        let user = with_deadline(timeout, self.state.users.find_by_user_id(&found.user_id))
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &found.user_id))?;

        tracing::info!(user_id = %user.user_id, "User logged in");
        Ok(user)
    }

    /// Exchange a valid refresh token for a new token pair.
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        request.validate().map_err(ServiceError::from_validation)?;

        let claims = self
            .state
            .jwt
            .validate_token(&request.refresh_token, TokenType::Refresh)?;

        // Re-read so the new tokens reflect the stored record, not stale claims.
        let user = with_deadline(
            self.state.store_timeout,
            self.state.users.find_by_user_id(claims.user_id()),
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("User", claims.user_id()))?;

        let pair = self.state.jwt.tokens_for(&user)?;
        self.update_all_tokens(&user.user_id, &pair.token, &pair.refresh_token)
            .await?;

        Ok(RefreshTokenResponse {
            token: pair.token,
            refresh_token: pair.refresh_token,
            expires_in: self.state.jwt.access_ttl_seconds(),
        })
    }

    /// Persist a newly issued token pair against `user_id`.
    ///
    /// The refresh token must verify as a refresh token and belong to
    /// `user_id` before anything stored is overwritten.
    pub async fn update_all_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
    ) -> ServiceResult<()> {
        let claims = self
            .state
            .jwt
            .validate_token(refresh_token, TokenType::Refresh)?;
        if claims.user_id() != user_id {
            return Err(ServiceError::token_invalid(
                "refresh token was issued for another user",
            ));
        }

        with_deadline(
            self.state.store_timeout,
            self.state
                .users
                .update_tokens(user_id, token, refresh_token, Utc::now()),
        )
        .await
    }
}
