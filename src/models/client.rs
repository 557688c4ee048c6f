//! Client (patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Internal row structure for database queries. The id column is TEXT;
/// conversion to [`Client`] parses it back into a UUID.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl TryFrom<ClientRow> for Client {
    type Error = AppError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<Uuid>()
            .map_err(|_| AppError::Internal(format!("Corrupt client id in store: {}", row.id)))?;
        Ok(Client {
            id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
        })
    }
}

/// Client record. The id is the long 128-bit identifier; the short
/// barcode-friendly form is derived through the identifier codec.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Create client request. The id is generated server-side.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Phone number is too short"))]
    pub phone: String,
}

/// Update client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Phone number is too short"))]
    pub phone: String,
}

/// Normalize a phone number to its digit string. Uniqueness is enforced on
/// the normalized form so "+40 721 234 567" and "0721234567"-style variants
/// of the same digits cannot coexist.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_normalization_strips_everything_but_digits() {
        assert_eq!(normalize_phone("+40 (721) 234-567"), "40721234567");
        assert_eq!(normalize_phone("0721234567"), "0721234567");
        assert_eq!(normalize_phone(""), "");
    }
}
