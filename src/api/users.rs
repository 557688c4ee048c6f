//! User management endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser},
};

use super::{auth::UserInfo, AuthenticatedUser};

/// List all staff accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserInfo>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    claims.require_admin()?;

    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// Create a new staff account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 403, description = "Administrator privileges required"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    claims.require_admin()?;
    user.validate()?;

    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update a staff account. Demoting the last administrator is rejected.
#[utoipa::path(
    put,
    path = "/users/{username}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserInfo),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Would demote the last administrator")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Json<UserInfo>> {
    claims.require_admin()?;
    update.validate()?;

    let updated = state.services.users.update_user(&username, update).await?;
    Ok(Json(updated.into()))
}

/// Delete a staff account. Self-deletion and deleting the last
/// administrator are rejected.
#[utoipa::path(
    delete,
    path = "/users/{username}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Cannot delete yourself or the last administrator")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete_user(&username, &claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
