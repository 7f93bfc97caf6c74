//! Process-wide state injected into every handler.

use crate::config::Config;
use crate::repositories::user_repository::UserRepository;
use crate::utils::crypto::PasswordHasher;
use crate::utils::jwt::JwtUtils;
use std::sync::Arc;
use std::time::Duration;

/// Read-only collaborators built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub jwt: Arc<JwtUtils>,
    pub hasher: PasswordHasher,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            users,
            jwt: Arc::new(JwtUtils::new(config)),
            hasher: PasswordHasher::new(config.bcrypt_cost),
            store_timeout: config.store_timeout(),
        }
    }
}
