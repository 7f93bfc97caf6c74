//! Handler functions for user listing and lookup.
//!
//! Both run behind `jwt_auth`, so the caller's claims are always present.

use crate::api::common::{ApiError, UserListQuery, service_error_to_http};
use crate::auth::policy::{require_role, require_self_or_role};
use crate::database::models::{Role, UserResponse};
use crate::services::user_service::UserService;
use crate::state::AppState;
use crate::utils::jwt::Claims;
use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};

/// One page of users plus the collection total.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserPageResponse {
    pub total_count: u64,
    pub user_items: Vec<UserResponse>,
}

/// Lists users page by page. Admins only.
#[axum::debug_handler]
pub async fn list_users(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserPageResponse>, ApiError> {
    require_role(&claims, Role::Admin).map_err(service_error_to_http)?;

    let page = query.page();
    let per_page = query.record_per_page();

    let result = UserService::new(&state)
        .list_users(query.start_index(), per_page as u64)
        .await
        .map_err(service_error_to_http)?;

    tracing::info!(
        admin = %claims.user_id(),
        page,
        per_page,
        total = result.total_count,
        "Listed users"
    );

    Ok(Json(UserPageResponse {
        total_count: result.total_count,
        user_items: result.user_items.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Retrieves a user by its ID. Callers may read their own record; admins may read any.
#[axum::debug_handler]
pub async fn get_user(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    require_self_or_role(&claims, &user_id, Role::Admin).map_err(service_error_to_http)?;

    let user = UserService::new(&state)
        .get_user_required(&user_id)
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed for ID {}: {}", user_id, e);
            service_error_to_http(e)
        })?;

    Ok(Json(user.into()))
}
