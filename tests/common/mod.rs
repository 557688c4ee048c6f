//! Shared test setup: application state over an in-memory database

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use libra_server::{
    config::AppConfig,
    models::{book::CreateBook, client::CreateClient},
    repository::Repository,
    services::Services,
    AppState,
};

/// Build a fully wired state over an in-memory SQLite database with the
/// migrations applied and the initial admin (admin/admin) seeded.
pub async fn test_state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid connection string")
        .foreign_keys(true);

    // A single connection: every pool checkout must see the same in-memory
    // database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let config = AppConfig::default();
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config);
    services
        .users
        .ensure_initial_admin()
        .await
        .expect("Failed to seed initial admin");

    AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    }
}

pub fn sample_book(isbn: &str, items: i64) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: "The Name of the Rose".to_string(),
        author: "Umberto Eco".to_string(),
        items,
    }
}

pub fn sample_client(email: &str, phone: &str) -> CreateClient {
    CreateClient {
        first_name: "Ada".to_string(),
        last_name: "Popescu".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}
