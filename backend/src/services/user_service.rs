//! User read operations.
//!
//! Handles listing and single-record lookup. Authorization is checked by the
//! handlers before these are called.

use crate::database::models::{User, UserPage};
use crate::errors::{ServiceError, ServiceResult};
use crate::services::with_deadline;
use crate::state::AppState;

pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Returns one page of users plus the total user count.
    ///
    /// # Arguments
    /// * `start` - Zero-based index of the first user on the page
    /// * `limit` - Page size, at least 1
    pub async fn list_users(&self, start: u64, limit: u64) -> ServiceResult<UserPage> {
        with_deadline(
            self.state.store_timeout,
            self.state.users.list_page(start, limit),
        )
        .await
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, user_id: &str) -> ServiceResult<User> {
        with_deadline(
            self.state.store_timeout,
            self.state.users.find_by_user_id(user_id),
        )
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id))
    }
}
