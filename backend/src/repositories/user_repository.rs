//! Document store repository for user records.
//!
//! Provides count, lookup, insert, token update and the paginated aggregation
//! used by the user listing.

use crate::database::models::{User, UserPage};
use crate::errors::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::{self, Bson, Document, doc},
    error::{ErrorKind, WriteFailure},
};
use tracing::instrument;

/// MongoDB duplicate key error code.
const DUPLICATE_KEY: i32 = 11000;

/// Storage interface for users.
///
/// Uniqueness of `email` and `phone` must be enforced by the backend itself;
/// a violating insert returns `RepositoryError::Duplicate`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count_by_email(&self, email: &str) -> RepositoryResult<u64>;

    async fn count_by_phone(&self, phone: &str) -> RepositoryResult<u64>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<User>>;

    async fn insert(&self, user: &User) -> RepositoryResult<()>;

    /// Overwrites the stored token pair. Fails with `NotFound` if no user matches.
    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()>;

    /// Total user count plus the `limit` users starting at `start`.
    async fn list_page(&self, start: u64, limit: u64) -> RepositoryResult<UserPage>;
}

/// Returns which unique field a duplicate key error refers to.
pub fn duplicate_key_field(err: &mongodb::error::Error) -> Option<&'static str> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            write_error.message.as_str()
        }
        _ => return None,
    };

    Some(field_from_duplicate_message(message))
}

fn field_from_duplicate_message(message: &str) -> &'static str {
    let index = message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default();

    if index.starts_with("phone") {
        "phone"
    } else if index.starts_with("user_id") {
        "user_id"
    } else {
        "email"
    }
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(collection: Collection<User>) -> Self {
        Self { collection }
    }

    /// `$match` / `$group` with `$push` / `$project` with `$slice`.
    fn page_pipeline(start: u64, limit: u64) -> Vec<Document> {
        let start = i64::try_from(start).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        vec![
            doc! { "$match": {} },
            doc! {
                "$group": {
                    "_id": Bson::Null,
                    "total_count": { "$sum": 1 },
                    "data": { "$push": "$$ROOT" },
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "total_count": 1,
                    "user_items": { "$slice": ["$data", start, limit] },
                }
            },
        ]
    }

    fn decode_page(result: Document) -> RepositoryResult<UserPage> {
        let total_count = match result.get("total_count") {
            Some(Bson::Int32(n)) => *n as u64,
            Some(Bson::Int64(n)) => *n as u64,
            _ => 0,
        };

        let user_items = match result.get_array("user_items") {
            Ok(items) => items
                .iter()
                .filter_map(Bson::as_document)
                .map(|doc| bson::from_document::<User>(doc.clone()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| RepositoryError::Database(anyhow::Error::new(e)))?,
            Err(_) => Vec::new(),
        };

        Ok(UserPage {
            total_count,
            user_items,
        })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn count_by_email(&self, email: &str) -> RepositoryResult<u64> {
        Ok(self.collection.count_documents(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn count_by_phone(&self, phone: &str) -> RepositoryResult<u64> {
        Ok(self.collection.count_documents(doc! { "phone": phone }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "user_id": user_id }).await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    async fn insert(&self, user: &User) -> RepositoryResult<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    #[instrument(skip(self, token, refresh_token))]
    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let updated_at =
            bson::to_bson(&updated_at).map_err(|e| RepositoryError::Database(e.into()))?;
        let result = self
            .collection
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$set": {
                        "token": token,
                        "refresh_token": refresh_token,
                        "updated_at": updated_at,
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound {
                user_id: user_id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_page(&self, start: u64, limit: u64) -> RepositoryResult<UserPage> {
        let mut cursor = self
            .collection
            .aggregate(Self::page_pipeline(start, limit))
            .await?;

        // The $group stage yields no document at all for an empty collection.
        match cursor.try_next().await? {
            Some(result) => Self::decode_page(result),
            None => Ok(UserPage::default()),
        }
    }
}
