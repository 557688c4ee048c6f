//! Clients repository for database operations

use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::client::{Client, ClientRow, UpdateClient},
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct ClientsRepository {
    pool: Pool<Sqlite>,
}

impl ClientsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all clients
    pub async fn get_all(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT * FROM clients ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Client::try_from).collect()
    }

    /// Get a client by id, as an optional
    pub async fn find(&self, id: Uuid) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Client::try_from).transpose()
    }

    /// Get a client by id
    pub async fn get(&self, id: Uuid) -> AppResult<Client> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    /// Insert a new client. Duplicate email or phone hits a UNIQUE
    /// constraint and comes back as Conflict; there is no separate
    /// pre-check to race against.
    pub async fn create(&self, client: &Client) -> AppResult<Client> {
        sqlx::query(
            "INSERT INTO clients (id, first_name, last_name, email, phone) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(client.id.to_string())
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A client with this email or phone"))?;

        Ok(client.clone())
    }

    /// Update an existing client (phone already normalized by the caller)
    pub async fn update(&self, id: Uuid, update: &UpdateClient) -> AppResult<Client> {
        let result = sqlx::query(
            "UPDATE clients SET first_name = $1, last_name = $2, email = $3, phone = $4 WHERE id = $5",
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A client with this email or phone"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Client {} not found", id)));
        }

        self.get(id).await
    }

    /// Delete a client. Rejected while the client holds active borrows;
    /// returned history rows cascade away with the client.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE client_id = $1 AND returned = 0",
        )
        .bind(id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Client {} still has {} active borrow(s)",
                id, active
            )));
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Client {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
