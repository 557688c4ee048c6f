//! Library settings model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Process-wide singleton settings record. Loaded as a whole and replaced
/// wholesale on save, never merged field by field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySettings {
    pub library_name: String,
    pub camera_device_id: Option<String>,
}

/// Save settings request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettings {
    #[validate(length(min = 1, message = "Library name is required"))]
    pub library_name: String,
    pub camera_device_id: Option<String>,
}
