//! Password hashing with bcrypt.
//!
//! Hashing and verification are CPU bound, so both run on tokio's blocking
//! pool rather than on the request task.

use crate::errors::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted one-way hash. A bcrypt failure is returned, never panicked on.
    pub async fn hash(&self, password: &str) -> ServiceResult<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Checks `password` against a stored hash.
    ///
    /// Any mismatch, including an unreadable stored hash, yields the generic
    /// authentication error.
    pub async fn verify(&self, stored_hash: &str, password: &str) -> ServiceResult<()> {
        let stored_hash = stored_hash.to_string();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored_hash))
            .await
            .map_err(|e| {
                ServiceError::internal_error(format!("Password verification task failed: {}", e))
            })?;

        match matches {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::authentication()),
            Err(e) => {
                tracing::warn!("Stored password hash could not be verified: {}", e);
                Err(ServiceError::authentication())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify_same_password() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("pw").await.unwrap();
        assert_ne!(hash, "pw");
        assert!(hasher.verify(&hash, "pw").await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_other_password_fails_generically() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("pw").await.unwrap();
        let err = hasher.verify(&hash, "other").await.unwrap_err();
        assert!(matches!(err, ServiceError::Authentication { .. }));
        assert_eq!(err.to_string(), "email or password is incorrect");
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(4);
        let first = hasher.hash("pw").await.unwrap();
        let second = hasher.hash("pw").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_a_mismatch() {
        let hasher = PasswordHasher::new(4);
        let err = hasher.verify("not-a-bcrypt-hash", "pw").await.unwrap_err();
        assert!(matches!(err, ServiceError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_invalid_cost_is_an_error_not_a_panic() {
        let hasher = PasswordHasher::new(99);
        assert!(matches!(
            hasher.hash("pw").await,
            Err(ServiceError::Internal { .. })
        ));
    }
}
