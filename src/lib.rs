//! Libra Server - Lending Ledger
//!
//! REST JSON backend for the Libra library manager: catalog, patrons,
//! staff accounts and the lending ledger, with barcode and badge exports.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod barcode;
pub mod config;
pub mod error;
pub mod ident;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/profile", put(api::auth::update_profile))
        // Library name, shown pre-login
        .route("/library", get(api::settings::get_library))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:isbn", get(api::books::get_book))
        .route("/books/:isbn", put(api::books::update_book))
        .route("/books/:isbn", delete(api::books::delete_book))
        .route("/books/:isbn/borrowers", get(api::borrows::get_book_borrowers))
        .route("/books/:isbn/availability", get(api::borrows::availability))
        .route("/books/:isbn/barcode", post(api::exports::book_barcode))
        // Clients (patrons)
        .route("/clients", get(api::clients::list_clients))
        .route("/clients", post(api::clients::create_client))
        .route("/clients/:id", get(api::clients::get_client))
        .route("/clients/:id", put(api::clients::update_client))
        .route("/clients/:id", delete(api::clients::delete_client))
        .route("/clients/:id/borrows", get(api::borrows::get_client_borrows))
        .route("/clients/:id/borrows", post(api::borrows::create_borrow))
        .route("/clients/:id/badge", post(api::exports::client_badge))
        // Borrows (ledger)
        .route("/borrows/:id/extend", post(api::borrows::extend_borrow))
        .route("/borrows/:id/return", post(api::borrows::return_borrow))
        .route("/borrows/:id", delete(api::borrows::revoke_borrow))
        // Lookup
        .route("/lookup/:isbn", get(api::lookup::lookup_book))
        // Users (admin)
        .route("/users", get(api::users::list_users))
        .route("/users", post(api::users::create_user))
        .route("/users/:username", put(api::users::update_user))
        .route("/users/:username", delete(api::users::delete_user))
        // Settings
        .route("/settings", get(api::settings::get_settings))
        .route("/settings", put(api::settings::update_settings))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
