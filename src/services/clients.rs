//! Clients service: patron management and identifier translation

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    ident,
    models::client::{normalize_phone, Client, CreateClient, UpdateClient},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve a path identifier that may be either the long UUID form or
    /// the short barcode code. Anything else is InvalidIdentifier.
    pub fn resolve_id(&self, raw: &str) -> AppResult<Uuid> {
        if let Ok(id) = raw.parse::<Uuid>() {
            return Ok(id);
        }
        if raw.len() == ident::SHORT_ID_LEN {
            return ident::decode(raw);
        }
        Err(AppError::InvalidIdentifier(format!(
            "'{}' is neither a client UUID nor a short code",
            raw
        )))
    }

    /// Short barcode form of a client identifier
    pub fn short_code(&self, id: Uuid) -> String {
        ident::encode(id)
    }

    /// List all clients
    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        self.repository.clients.get_all().await
    }

    /// Get a client by id
    pub async fn get_client(&self, id: Uuid) -> AppResult<Client> {
        self.repository.clients.get(id).await
    }

    /// Create a new client. The long identifier is generated here; email
    /// and normalized phone uniqueness are enforced by the store.
    pub async fn create_client(&self, client: CreateClient) -> AppResult<Client> {
        let client = Client {
            id: Uuid::new_v4(),
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone: normalize_phone(&client.phone),
        };
        self.repository.clients.create(&client).await
    }

    /// Update an existing client
    pub async fn update_client(&self, id: Uuid, mut update: UpdateClient) -> AppResult<Client> {
        update.phone = normalize_phone(&update.phone);
        self.repository.clients.update(id, &update).await
    }

    /// Delete a client; rejected while they hold active borrows
    pub async fn delete_client(&self, id: Uuid) -> AppResult<()> {
        self.repository.clients.delete(id).await
    }
}
