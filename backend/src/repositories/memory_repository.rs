//! In-memory `UserRepository` used by the test suite.
//!
//! Mirrors the MongoDB backend's unique indexes and aggregation semantics, and
//! can inject latency to exercise store deadlines.

use crate::database::models::{User, UserPage};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::repositories::user_repository::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    latency: Option<Duration>,
    inserts: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the data.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Number of successful inserts so far.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn count_by_email(&self, email: &str) -> RepositoryResult<u64> {
        self.delay().await;
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.email == email).count() as u64)
    }

    async fn count_by_phone(&self, phone: &str) -> RepositoryResult<u64> {
        self.delay().await;
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.phone == phone).count() as u64)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.delay().await;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        self.delay().await;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert(&self, user: &User) -> RepositoryResult<()> {
        self.delay().await;
        let mut users = self.users.write().await;
        let duplicate = if users.iter().any(|u| u.email == user.email) {
            Some("email")
        } else if users.iter().any(|u| u.phone == user.phone) {
            Some("phone")
        } else if users.iter().any(|u| u.user_id == user.user_id) {
            Some("user_id")
        } else {
            None
        };

        if let Some(field) = duplicate {
            return Err(RepositoryError::Duplicate {
                field: field.to_string(),
            });
        }

        users.push(user.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        self.delay().await;
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| RepositoryError::NotFound {
                user_id: user_id.to_string(),
            })?;

        user.token = Some(token.to_string());
        user.refresh_token = Some(refresh_token.to_string());
        user.updated_at = updated_at;
        Ok(())
    }

    async fn list_page(&self, start: u64, limit: u64) -> RepositoryResult<UserPage> {
        self.delay().await;
        let users = self.users.read().await;
        Ok(UserPage {
            total_count: users.len() as u64,
            user_items: users
                .iter()
                .skip(start as usize)
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }
}
