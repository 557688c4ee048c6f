//! Borrows repository: the only writer of ledger rows

use chrono::NaiveDate;
use sqlx::{Pool, Row, Sqlite, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrow::{Availability, Borrow, BorrowRow, BorrowedBook, Borrower},
        client::Client,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Sqlite>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get a borrow by id
    pub async fn get(&self, id: i64) -> AppResult<Borrow> {
        let row = sqlx::query_as::<_, BorrowRow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow {} not found", id)))?;

        Borrow::try_from(row)
    }

    /// Evaluate the availability rule inside an open transaction so the
    /// caller can insert under the same atomic unit.
    async fn availability_tx(
        tx: &mut Transaction<'_, Sqlite>,
        isbn: &str,
        client_id: Uuid,
    ) -> AppResult<Availability> {
        let items: Option<i64> = sqlx::query_scalar("SELECT items FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&mut **tx)
            .await?;

        let items =
            items.ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;

        let client_holds: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrows WHERE book_isbn = $1 AND client_id = $2 AND returned = 0)",
        )
        .bind(isbn)
        .bind(client_id.to_string())
        .fetch_one(&mut **tx)
        .await?;

        if client_holds {
            return Ok(Availability::AlreadyBorrowed);
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE book_isbn = $1 AND returned = 0",
        )
        .bind(isbn)
        .fetch_one(&mut **tx)
        .await?;

        if active >= items {
            return Ok(Availability::NoCopies);
        }

        Ok(Availability::Available)
    }

    /// Evaluate the availability rule outside of any write path
    pub async fn availability(&self, isbn: &str, client_id: Uuid) -> AppResult<Availability> {
        let mut tx = self.pool.begin().await?;
        let availability = Self::availability_tx(&mut tx, isbn, client_id).await?;
        tx.commit().await?;
        Ok(availability)
    }

    /// Check availability and insert the borrow as one atomic unit. The
    /// caller serializes invocations; the transaction keeps the check and
    /// the insert consistent at the store level, so the active count can
    /// never exceed `items`.
    pub async fn create_checked(
        &self,
        client_id: Uuid,
        isbn: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let client_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(client_id.to_string())
                .fetch_one(&mut *tx)
                .await?;
        if !client_exists {
            return Err(AppError::NotFound(format!("Client {} not found", client_id)));
        }

        match Self::availability_tx(&mut tx, isbn, client_id).await? {
            Availability::Available => {}
            Availability::NoCopies => {
                return Err(AppError::Unavailable(format!(
                    "No free copies of {} left",
                    isbn
                )));
            }
            Availability::AlreadyBorrowed => {
                return Err(AppError::Unavailable(format!(
                    "Client already holds an active borrow of {}",
                    isbn
                )));
            }
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO borrows (client_id, book_isbn, start_date, end_date, returned)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id
            "#,
        )
        .bind(client_id.to_string())
        .bind(isbn)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Borrow {
            id,
            client_id,
            book_isbn: isbn.to_string(),
            start_date,
            end_date,
            returned: false,
        })
    }

    /// Move the due date of an active borrow forward. Returned borrows are
    /// terminal, so the update is conditioned on `returned = 0` and a
    /// mismatch is reported as InvalidState.
    pub async fn extend(&self, id: i64, new_end_date: NaiveDate) -> AppResult<Borrow> {
        let result = sqlx::query("UPDATE borrows SET end_date = $1 WHERE id = $2 AND returned = 0")
            .bind(new_end_date)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing row from a terminal one
            let borrow = self.get(id).await?;
            debug_assert!(borrow.returned);
            return Err(AppError::InvalidState(format!(
                "Borrow {} has already been returned",
                id
            )));
        }

        self.get(id).await
    }

    /// Mark an active borrow returned; `end_date` becomes the return date
    pub async fn mark_returned(&self, id: i64, return_date: NaiveDate) -> AppResult<Borrow> {
        let result = sqlx::query(
            "UPDATE borrows SET end_date = $1, returned = 1 WHERE id = $2 AND returned = 0",
        )
        .bind(return_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let borrow = self.get(id).await?;
            debug_assert!(borrow.returned);
            return Err(AppError::InvalidState(format!(
                "Borrow {} has already been returned",
                id
            )));
        }

        self.get(id).await
    }

    /// Hard-delete a borrow regardless of state. Idempotent: deleting an id
    /// that does not exist is a no-op, not an error.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM borrows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All borrows of a client (active and history), joined with their books
    pub async fn borrowed_books(&self, client_id: Uuid) -> AppResult<Vec<BorrowedBook>> {
        let rows = sqlx::query(
            r#"
            SELECT b.isbn, b.title, b.author, b.items,
                   br.id AS borrow_id, br.start_date, br.end_date, br.returned
            FROM borrows br
            JOIN books b ON br.book_isbn = b.isbn
            WHERE br.client_id = $1
            ORDER BY br.end_date
            "#,
        )
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let today = chrono::Local::now().date_naive();
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let book = Book {
                isbn: row.get("isbn"),
                title: row.get("title"),
                author: row.get("author"),
                items: row.get("items"),
            };
            let borrow = Borrow {
                id: row.get("borrow_id"),
                client_id,
                book_isbn: book.isbn.clone(),
                start_date: row.get("start_date"),
                end_date: row.get("end_date"),
                returned: row.get("returned"),
            };
            result.push(BorrowedBook {
                book,
                borrow: borrow.into_view(today),
            });
        }
        Ok(result)
    }

    /// All borrows referencing a book, joined with their clients
    pub async fn borrowers(&self, isbn: &str) -> AppResult<Vec<Borrower>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id AS client_id, c.first_name, c.last_name, c.email, c.phone,
                   br.id AS borrow_id, br.start_date, br.end_date, br.returned
            FROM borrows br
            JOIN clients c ON br.client_id = c.id
            WHERE br.book_isbn = $1
            ORDER BY br.end_date
            "#,
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;

        let today = chrono::Local::now().date_naive();
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_id: String = row.get("client_id");
            let client_id = raw_id.parse::<Uuid>().map_err(|_| {
                AppError::Internal(format!("Corrupt client id in store: {}", raw_id))
            })?;
            let client = Client {
                id: client_id,
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                email: row.get("email"),
                phone: row.get("phone"),
            };
            let borrow = Borrow {
                id: row.get("borrow_id"),
                client_id,
                book_isbn: isbn.to_string(),
                start_date: row.get("start_date"),
                end_date: row.get("end_date"),
                returned: row.get("returned"),
            };
            result.push(Borrower {
                client,
                borrow: borrow.into_view(today),
            });
        }
        Ok(result)
    }
}
