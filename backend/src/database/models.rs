//! Rust structs that represent document store mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the `user` collection. `UserResponse` is the outward view handed to API
//! clients and never carries the password hash.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned at signup. There is no endpoint that changes it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Hex form of `id`, used as the public identifier.
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash
    pub password: String,
    pub email: String,
    pub phone: String,
    pub user_type: Role,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a user record; the hash is computed beforehand.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub user_type: Role,
}

impl User {
    /// Builds a fresh record with a new ObjectId and matching `user_id`.
    pub fn new(input: NewUser) -> Self {
        let id = ObjectId::new();
        let now = Utc::now();
        Self {
            user_id: id.to_hex(),
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            password: input.password_hash,
            email: input.email,
            phone: input.phone,
            user_type: input.user_type,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of the paginated aggregation over the user collection.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub total_count: u64,
    pub user_items: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub user_type: Role,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            user_type: user.user_type,
            token: user.token,
            refresh_token: user.refresh_token,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
