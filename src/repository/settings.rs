//! Settings repository: the singleton library settings row

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::settings::{LibrarySettings, SaveSettings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Sqlite>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Load the settings record
    pub async fn get(&self) -> AppResult<LibrarySettings> {
        sqlx::query_as::<_, LibrarySettings>(
            "SELECT library_name, camera_device_id FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal("Settings row is missing".to_string()))
    }

    /// Replace the settings record wholesale. A single UPDATE, never a
    /// field-by-field merge, so concurrent savers cannot interleave.
    pub async fn save(&self, settings: &SaveSettings) -> AppResult<LibrarySettings> {
        sqlx::query("UPDATE settings SET library_name = $1, camera_device_id = $2 WHERE id = 1")
            .bind(&settings.library_name)
            .bind(&settings.camera_device_id)
            .execute(&self.pool)
            .await?;

        self.get().await
    }
}
