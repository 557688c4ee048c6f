//! Barcode and badge export endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Path of a written export file
#[derive(Serialize, ToSchema)]
pub struct ExportResponse {
    /// Filesystem path of the generated SVG
    pub path: String,
}

/// Generate an EAN-13 barcode SVG for a book
#[utoipa::path(
    post,
    path = "/books/{isbn}/barcode",
    tag = "exports",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Barcode written", body = ExportResponse),
        (status = 400, description = "ISBN is not a valid EAN-13 number"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "File write failed")
    )
)]
pub async fn book_barcode(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<Json<ExportResponse>> {
    let path = state.services.exports.book_barcode(&isbn).await?;
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}

/// Generate a badge SVG for a client, with the short code as Code 128
#[utoipa::path(
    post,
    path = "/clients/{id}/badge",
    tag = "exports",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    responses(
        (status = 200, description = "Badge written", body = ExportResponse),
        (status = 404, description = "Client not found"),
        (status = 500, description = "File write failed")
    )
)]
pub async fn client_badge(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ExportResponse>> {
    let id = state.services.clients.resolve_id(&id)?;
    let library_name = state.services.settings.library_name().await?;
    let path = state.services.exports.client_badge(id, &library_name).await?;
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}
