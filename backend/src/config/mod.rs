//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the document store location, token signing settings, password hashing cost
//! and the server port.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Longest token lifetime accepted from the environment (ten years).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

fn token_ttl(name: &str, default: u64) -> Result<u64> {
    let seconds = match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("{} must be a valid number", name))?,
        Err(_) => default,
    };
    check_token_ttl(name, seconds)
}

fn check_token_ttl(name: &str, seconds: u64) -> Result<u64> {
    if seconds == 0 || seconds > MAX_TOKEN_TTL_SECONDS {
        anyhow::bail!(
            "{} must be between 1 and {} seconds",
            name,
            MAX_TOKEN_TTL_SECONDS
        );
    }
    Ok(seconds)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub jwt_refresh_expires_in_seconds: u64,
    pub bcrypt_cost: u32,
    pub store_timeout_seconds: u64,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("MONGODB_URI").context("MONGODB_URI not set")?;

        let database_name =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "userbase".to_string());

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_expires_in_seconds = token_ttl("JWT_EXPIRES_IN_SECONDS", 86400)?;
        let jwt_refresh_expires_in_seconds =
            token_ttl("JWT_REFRESH_EXPIRES_IN_SECONDS", 604800)?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| "14".to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;

        let store_timeout_seconds = env::var("STORE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            database_name,
            jwt_secret,
            jwt_expires_in_seconds,
            jwt_refresh_expires_in_seconds,
            bcrypt_cost,
            store_timeout_seconds,
            server_port,
        })
    }

    /// Deadline applied to every document store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }

    /// Configuration used by unit and router tests: cheap bcrypt cost, no env access.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "mongodb://localhost:27017".to_string(),
            database_name: "userbase_test".to_string(),
            jwt_secret: "test-secret-key".to_string(),
            jwt_expires_in_seconds: 86400,
            jwt_refresh_expires_in_seconds: 604800,
            bcrypt_cost: 4,
            store_timeout_seconds: 5,
            server_port: 8000,
        }
    }
}
