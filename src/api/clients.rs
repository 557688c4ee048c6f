//! Client (patron) endpoints.
//!
//! Path identifiers accept either the long UUID or the 26-character short
//! code printed on badges; scanners submit the latter.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::client::{Client, CreateClient, UpdateClient},
};

use super::AuthenticatedUser;

/// List all clients
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of clients", body = Vec<Client>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_clients(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Client>>> {
    let clients = state.services.clients.list_clients().await?;
    Ok(Json(clients))
}

/// Get a client by UUID or short code
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    responses(
        (status = 200, description = "Client details", body = Client),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let id = state.services.clients.resolve_id(&id)?;
    let client = state.services.clients.get_client(id).await?;
    Ok(Json(client))
}

/// Register a new client; the identifier is generated server-side
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or phone already registered")
    )
)]
pub async fn create_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(client): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    client.validate()?;

    let created = state.services.clients.create_client(client).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing client
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Email or phone already registered")
    )
)]
pub async fn update_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(update): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    update.validate()?;

    let id = state.services.clients.resolve_id(&id)?;
    let updated = state.services.clients.update_client(id, update).await?;
    Ok(Json(updated))
}

/// Delete a client. Fails while they hold active borrows; returned history
/// rows are removed with them.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Client UUID or short code")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Client has active borrows")
    )
)]
pub async fn delete_client(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = state.services.clients.resolve_id(&id)?;
    state.services.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
