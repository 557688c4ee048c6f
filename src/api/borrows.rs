//! Lending ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::borrow::{Availability, Borrow, BorrowedBook, Borrower, CreateBorrow},
};

use super::AuthenticatedUser;

/// Availability query parameters
#[derive(Deserialize, ToSchema)]
pub struct AvailabilityQuery {
    /// Client UUID or short code
    pub client_id: String,
}

/// Outcome of the availability check
#[derive(Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Whether this client may borrow a copy right now
    pub available: bool,
    /// Human-readable reason when unavailable
    pub reason: Option<String>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        let reason = match availability {
            Availability::Available => None,
            Availability::NoCopies => Some("All copies are currently borrowed".to_string()),
            Availability::AlreadyBorrowed => {
                Some("Client already holds an active borrow of this book".to_string())
            }
        };
        Self {
            available: availability.is_available(),
            reason,
        }
    }
}

/// All borrows of a client, with their books and the derived late flag
#[utoipa::path(
    get,
    path = "/clients/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    responses(
        (status = 200, description = "Client's borrows, active and history", body = Vec<BorrowedBook>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BorrowedBook>>> {
    let client_id = state.services.clients.resolve_id(&id)?;
    let borrows = state.services.ledger.borrowed_books(client_id).await?;
    Ok(Json(borrows))
}

/// All borrows referencing a book, with their clients
#[utoipa::path(
    get,
    path = "/books/{isbn}/borrowers",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book's borrowers, active and history", body = Vec<Borrower>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_borrowers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Vec<Borrower>>> {
    let borrowers = state.services.ledger.borrowers(&isbn).await?;
    Ok(Json(borrowers))
}

/// Check whether a client may borrow a copy of a book right now
#[utoipa::path(
    get,
    path = "/books/{isbn}/availability",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN"),
        ("client_id" = String, Query, description = "Client UUID or short code")
    ),
    responses(
        (status = 200, description = "Availability verdict", body = AvailabilityResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let client_id = state.services.clients.resolve_id(&query.client_id)?;
    let availability = state.services.ledger.availability(&isbn, client_id).await?;
    Ok(Json(availability.into()))
}

/// Create a new borrow for a client
#[utoipa::path(
    post,
    path = "/clients/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Borrow created", body = Borrow),
        (status = 404, description = "Client or book not found"),
        (status = 409, description = "Book not available for this client")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<Borrow>)> {
    request.validate()?;

    let client_id = state.services.clients.resolve_id(&id)?;
    let borrow = state
        .services
        .ledger
        .create_borrow(client_id, &request.isbn)
        .await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Extend an active borrow by one loan period
#[utoipa::path(
    post,
    path = "/borrows/{id}/extend",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow extended", body = Borrow),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Borrow already returned")
    )
)]
pub async fn extend_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.ledger.extend_borrow(id).await?;
    Ok(Json(borrow))
}

/// Return an active borrow
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow returned", body = Borrow),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Borrow already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.ledger.return_borrow(id).await?;
    Ok(Json(borrow))
}

/// Revoke a borrow (hard delete, undo of a mistaken entry). Idempotent.
#[utoipa::path(
    delete,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Borrow ID")
    ),
    responses(
        (status = 204, description = "Borrow revoked (or never existed)")
    )
)]
pub async fn revoke_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.ledger.revoke_borrow(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
