//! External catalog lookup endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, services::lookup::BookData};

use super::AuthenticatedUser;

/// Look up a book in the Open Library catalog by ISBN.
/// `null` when the catalog does not know the ISBN.
#[utoipa::path(
    get,
    path = "/lookup/{isbn}",
    tag = "lookup",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Catalog data, or null when unknown", body = BookData),
        (status = 502, description = "Catalog unreachable")
    )
)]
pub async fn lookup_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<Option<BookData>>> {
    let book = state.services.lookup.lookup_book(&isbn).await?;
    Ok(Json(book))
}
