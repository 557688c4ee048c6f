//! Library settings service

use crate::{
    error::AppResult,
    models::settings::{LibrarySettings, SaveSettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Current settings; the row always exists (seeded by migration)
    pub async fn get(&self) -> AppResult<LibrarySettings> {
        self.repository.settings.get().await
    }

    /// Replace the settings wholesale
    pub async fn save(&self, settings: SaveSettings) -> AppResult<LibrarySettings> {
        self.repository.settings.save(&settings).await
    }

    /// Display name of the library, used on badges and the public endpoint
    pub async fn library_name(&self) -> AppResult<String> {
        Ok(self.get().await?.library_name)
    }
}
