//! Module for core business logic services.
//!
//! Services sit between the HTTP handlers and the user repository. Every
//! store call made from a service goes through [`with_deadline`].

use crate::errors::{RepositoryResult, ServiceError, ServiceResult};
use std::future::Future;
use std::time::Duration;

pub mod user_service;

/// Runs a store operation, failing with `ServiceError::Timeout` once `timeout` elapses.
pub async fn with_deadline<T, F>(timeout: Duration, operation: F) -> ServiceResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result.map_err(ServiceError::from),
        Err(_) => {
            tracing::error!("Store operation exceeded {:?}", timeout);
            Err(ServiceError::Timeout { timeout })
        }
    }
}
