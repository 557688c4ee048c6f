//! Library settings endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::settings::{LibrarySettings, SaveSettings},
};

use super::AuthenticatedUser;

/// Public library info, shown on the login screen before authentication
#[derive(Serialize, ToSchema)]
pub struct LibraryInfo {
    /// Display name of the library
    pub name: String,
}

/// Get the library name (no authentication required)
#[utoipa::path(
    get,
    path = "/library",
    tag = "settings",
    responses(
        (status = 200, description = "Library info", body = LibraryInfo)
    )
)]
pub async fn get_library(
    State(state): State<crate::AppState>,
) -> AppResult<Json<LibraryInfo>> {
    let name = state.services.settings.library_name().await?;
    Ok(Json(LibraryInfo { name }))
}

/// Get the current settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = LibrarySettings),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<LibrarySettings>> {
    let settings = state.services.settings.get().await?;
    Ok(Json(settings))
}

/// Replace the settings wholesale (admin only)
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = SaveSettings,
    responses(
        (status = 200, description = "Settings saved", body = LibrarySettings),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(settings): Json<SaveSettings>,
) -> AppResult<Json<LibrarySettings>> {
    claims.require_admin()?;
    settings.validate()?;

    let saved = state.services.settings.save(settings).await?;
    Ok(Json(saved))
}
