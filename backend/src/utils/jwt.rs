//! JWT token utilities for authentication and authorization.
//!
//! Provides token creation, validation, and claims management. Access and
//! refresh tokens carry the same user claims; `token_type` tells them apart so
//! neither can stand in for the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{Role, User};
use crate::errors::{ServiceError, ServiceResult};

/// Which half of a token pair a token is.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT Claims structure containing user identity data
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// User ID
    pub uid: String,
    /// User role
    pub user_type: Role,
    pub token_type: TokenType,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.uid
    }

    pub fn role(&self) -> Role {
        self.user_type
    }

    /// Check if user has specific role
    pub fn has_role(&self, role: Role) -> bool {
        self.user_type == role
    }
}

/// Access and refresh token pair issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Saturates instead of panicking on lifetimes chrono cannot represent.
fn ttl(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the loaded configuration
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            access_ttl: ttl(config.jwt_expires_in_seconds),
            refresh_ttl: ttl(config.jwt_refresh_expires_in_seconds),
        }
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Generate a signed access token and a longer-lived refresh token
    pub fn generate_all_tokens(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        user_type: Role,
        user_id: &str,
    ) -> ServiceResult<TokenPair> {
        let now = Utc::now();
        let expiry = |ttl: Duration| {
            now.checked_add_signed(ttl)
                .map(|at| at.timestamp() as usize)
                .ok_or_else(|| ServiceError::internal_error("token lifetime out of range"))
        };
        let claims = |token_type: TokenType, exp: usize| Claims {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            uid: user_id.to_string(),
            user_type,
            token_type,
            exp,
            iat: now.timestamp() as usize,
        };

        Ok(TokenPair {
            token: self.sign(&claims(TokenType::Access, expiry(self.access_ttl)?))?,
            refresh_token: self.sign(&claims(TokenType::Refresh, expiry(self.refresh_ttl)?))?,
        })
    }

    /// Token pair for a stored user record.
    pub fn tokens_for(&self, user: &User) -> ServiceResult<TokenPair> {
        self.generate_all_tokens(
            &user.email,
            &user.first_name,
            &user.last_name,
            user.user_type,
            &user.user_id,
        )
    }

    /// Validate and decode a JWT token of the expected type
    pub fn validate_token(&self, token: &str, expected: TokenType) -> ServiceResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::token_invalid(e.to_string()),
            })?;

        if claims.token_type != expected {
            return Err(ServiceError::token_invalid(format!(
                "expected {} token, got {} token",
                expected, claims.token_type
            )));
        }
        Ok(claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> ServiceResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtUtils {
        JwtUtils::new(&Config::for_tests())
    }

    #[test]
    fn test_issued_token_round_trips_claims() {
        let jwt = jwt();
        let pair = jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1")
            .unwrap();

        let claims = jwt.validate_token(&pair.token, TokenType::Access).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.last_name, "Lovelace");
        assert_eq!(claims.user_id(), "u1");
        assert_eq!(claims.role(), Role::User);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let jwt = jwt();
        let pair = jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::Admin, "u1")
            .unwrap();

        let access = jwt.validate_token(&pair.token, TokenType::Access).unwrap();
        let refresh = jwt
            .validate_token(&pair.refresh_token, TokenType::Refresh)
            .unwrap();
        assert_eq!(access.exp - access.iat, 86400);
        assert_eq!(refresh.exp - refresh.iat, 604800);
        assert_eq!(refresh.uid, access.uid);
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let jwt = jwt();
        let now = Utc::now().timestamp() as usize;
        let token = jwt
            .sign(&Claims {
                email: "a@x.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                uid: "u1".to_string(),
                user_type: Role::User,
                token_type: TokenType::Access,
                exp: now - 10,
                iat: now - 100,
            })
            .unwrap();

        assert!(matches!(
            jwt.validate_token(&token, TokenType::Access),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let mut other = Config::for_tests();
        other.jwt_secret = "another-secret".to_string();
        let pair = JwtUtils::new(&other)
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1")
            .unwrap();

        assert!(matches!(
            jwt().validate_token(&pair.token, TokenType::Access),
            Err(ServiceError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            jwt().validate_token("not-a-token", TokenType::Access),
            Err(ServiceError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let jwt = jwt();
        let pair = jwt
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1")
            .unwrap();

        assert!(matches!(
            jwt.validate_token(&pair.refresh_token, TokenType::Access),
            Err(ServiceError::TokenInvalid { .. })
        ));
        assert!(matches!(
            jwt.validate_token(&pair.token, TokenType::Refresh),
            Err(ServiceError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_huge_ttl_does_not_panic() {
        let mut config = Config::for_tests();
        config.jwt_expires_in_seconds = u64::MAX;
        let result = JwtUtils::new(&config)
            .generate_all_tokens("a@x.com", "Ada", "Lovelace", Role::User, "u1");
        assert!(result.is_err());
    }
}
