//! Module for document store connection setup.
//!
//! This module is responsible for connecting to MongoDB, handing out the user
//! collection and creating the unique indexes that back the email/phone
//! uniqueness invariant.

use crate::config::Config;
use anyhow::{Context, Result};
use models::User;
use mongodb::{
    Client, Collection, IndexModel,
    bson::doc,
    options::{ClientOptions, IndexOptions},
};
use std::time::Duration;

pub mod models;

pub const USER_COLLECTION: &str = "user";

#[derive(Clone)]
pub struct Database {
    pub client: Client,
    pub db: mongodb::Database,
}

impl Database {
    /// Connects to MongoDB and selects the configured database.
    pub async fn new(config: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.database_url)
            .await
            .context("invalid MONGODB_URI")?;
        options.app_name = Some("userbase".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.store_timeout_seconds));

        let client = Client::with_options(options)?;
        let db = client.database(&config.database_name);

        db.run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        Ok(Database { client, db })
    }

    /// Returns the user collection.
    pub fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USER_COLLECTION)
    }

    /// Creates the unique indexes the signup flow relies on.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique = |field: &str| {
            IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{field}_unique"))
                        .build(),
                )
                .build()
        };

        self.users()
            .create_indexes(vec![unique("email"), unique("phone"), unique("user_id")])
            .await
            .context("failed to create user indexes")?;

        tracing::info!("User collection indexes ensured");
        Ok(())
    }

    /// Shuts down the client.
    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::info!("Database connection closed.");
    }
}
