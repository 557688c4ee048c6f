//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Book record. The ISBN is the primary key; `items` is the number of
/// physical copies owned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub items: i64,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// 13-digit ISBN. Stored even when the EAN-13 check digit is wrong;
    /// only barcode issuance insists on a valid check digit.
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 0, message = "Copy count cannot be negative"))]
    pub items: i64,
}

/// Update book request (the ISBN itself is immutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 0, message = "Copy count cannot be negative"))]
    pub items: i64,
}

/// An ISBN must be exactly 13 decimal digits
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    if isbn.len() == 13 && isbn.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_must_be_thirteen_digits() {
        assert!(validate_isbn("9780000000002").is_ok());
        assert!(validate_isbn("978000000000").is_err());
        assert!(validate_isbn("97800000000021").is_err());
        assert!(validate_isbn("97800000000a2").is_err());
        assert!(validate_isbn("").is_err());
    }
}
