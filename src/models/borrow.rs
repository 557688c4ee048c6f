//! Borrow (ledger entry) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::book::{validate_isbn, Book};
use crate::models::client::Client;

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct BorrowRow {
    id: i64,
    client_id: String,
    book_isbn: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    returned: bool,
}

impl TryFrom<BorrowRow> for Borrow {
    type Error = AppError;

    fn try_from(row: BorrowRow) -> Result<Self, Self::Error> {
        let client_id = row.client_id.parse::<Uuid>().map_err(|_| {
            AppError::Internal(format!("Corrupt client id in borrow row: {}", row.client_id))
        })?;
        Ok(Borrow {
            id: row.id,
            client_id,
            book_isbn: row.book_isbn,
            start_date: row.start_date,
            end_date: row.end_date,
            returned: row.returned,
        })
    }
}

/// Ledger entry. `end_date` is the due date while active and the return
/// date once returned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    pub id: i64,
    pub client_id: Uuid,
    pub book_isbn: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub returned: bool,
}

impl Borrow {
    /// Late is derived, never stored: an active borrow past its due date.
    pub fn is_late(&self, today: NaiveDate) -> bool {
        !self.returned && self.end_date < today
    }

    pub fn into_view(self, today: NaiveDate) -> BorrowView {
        let late = self.is_late(today);
        BorrowView {
            id: self.id,
            client_id: self.client_id,
            book_isbn: self.book_isbn,
            start_date: self.start_date,
            end_date: self.end_date,
            returned: self.returned,
            late,
        }
    }
}

/// Borrow as presented to consumers, with the derived late flag
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowView {
    pub id: i64,
    pub client_id: Uuid,
    pub book_isbn: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub returned: bool,
    pub late: bool,
}

/// Borrow joined with its book, used by the client detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBook {
    pub book: Book,
    pub borrow: BorrowView,
}

/// Borrow joined with its client, used by the book detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub client: Client,
    pub borrow: BorrowView,
}

/// Add borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrow {
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: String,
}

/// Outcome of the availability rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// All copies are out
    NoCopies,
    /// This client already holds an active borrow of this book
    AlreadyBorrowed,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}
