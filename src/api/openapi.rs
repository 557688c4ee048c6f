//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, borrows, books, clients, exports, health, lookup, settings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libra API",
        version = "1.0.0",
        description = "Lending ledger REST API for the Libra library manager",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::update_profile,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Borrows
        borrows::get_client_borrows,
        borrows::get_book_borrowers,
        borrows::availability,
        borrows::create_borrow,
        borrows::extend_borrow,
        borrows::return_borrow,
        borrows::revoke_borrow,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Lookup
        lookup::lookup_book,
        // Exports
        exports::book_barcode,
        exports::client_badge,
        // Settings
        settings::get_library,
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Clients
            crate::models::client::Client,
            crate::models::client::CreateClient,
            crate::models::client::UpdateClient,
            // Borrows
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowView,
            crate::models::borrow::BorrowedBook,
            crate::models::borrow::Borrower,
            crate::models::borrow::CreateBorrow,
            borrows::AvailabilityQuery,
            borrows::AvailabilityResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            // Lookup
            crate::services::lookup::BookData,
            crate::services::lookup::Author,
            // Exports
            exports::ExportResponse,
            // Settings
            crate::models::settings::LibrarySettings,
            crate::models::settings::SaveSettings,
            settings::LibraryInfo,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "clients", description = "Patron management"),
        (name = "borrows", description = "Lending ledger"),
        (name = "users", description = "Staff account management"),
        (name = "lookup", description = "External catalog lookup"),
        (name = "exports", description = "Barcode and badge files"),
        (name = "settings", description = "Library settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
