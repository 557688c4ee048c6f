//! Lending ledger service: the state machine for borrow records.
//!
//! A borrow is either Active (returned = false) or Returned (terminal).
//! Creation goes through the availability rule; extension and return only
//! apply to active borrows; revocation hard-deletes regardless of state.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::LoansConfig,
    error::AppResult,
    models::borrow::{Availability, Borrow, BorrowedBook, Borrower},
    repository::Repository,
};

#[derive(Clone)]
pub struct LedgerService {
    repository: Repository,
    loan_period: Duration,
    /// Serializes ledger writes so the availability check and the borrow
    /// insert act as one atomic pair. Requests here are short and the
    /// caller population is a handful of desktop views, so a single write
    /// lock beats per-ISBN bookkeeping.
    write_lock: Arc<Mutex<()>>,
}

impl LedgerService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self {
            repository,
            loan_period: Duration::days(config.loan_period_days),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Evaluate the availability rule for one book and client.
    /// NotFound when the book does not exist; Unavailable is split into
    /// "no copies" and "duplicate hold" for the caller's message.
    pub async fn availability(&self, isbn: &str, client_id: Uuid) -> AppResult<Availability> {
        self.repository.borrows.availability(isbn, client_id).await
    }

    /// Create a new active borrow: start today, due after one loan period
    pub async fn create_borrow(&self, client_id: Uuid, isbn: &str) -> AppResult<Borrow> {
        let _guard = self.write_lock.lock().await;

        let start = Self::today();
        let end = start + self.loan_period;
        let borrow = self
            .repository
            .borrows
            .create_checked(client_id, isbn, start, end)
            .await?;

        tracing::info!(
            "Borrow {} created: client {} took {} until {}",
            borrow.id,
            client_id,
            isbn,
            end
        );
        Ok(borrow)
    }

    /// Extend an active borrow by one loan period, counted from the current
    /// due date rather than from today, so an overdue loan resumes where it
    /// left off.
    pub async fn extend_borrow(&self, id: i64) -> AppResult<Borrow> {
        let _guard = self.write_lock.lock().await;

        let borrow = self.repository.borrows.get(id).await?;
        let new_end = borrow.end_date + self.loan_period;
        self.repository.borrows.extend(id, new_end).await
    }

    /// Return an active borrow; `end_date` becomes today's date and the
    /// record turns terminal.
    pub async fn return_borrow(&self, id: i64) -> AppResult<Borrow> {
        let _guard = self.write_lock.lock().await;

        self.repository.borrows.mark_returned(id, Self::today()).await
    }

    /// Revoke (hard-delete) a borrow, used to undo mistaken entries.
    /// Idempotent: revoking an unknown id is a no-op.
    pub async fn revoke_borrow(&self, id: i64) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        self.repository.borrows.delete(id).await
    }

    /// All borrows of a client with their books (active and history)
    pub async fn borrowed_books(&self, client_id: Uuid) -> AppResult<Vec<BorrowedBook>> {
        // Surface a missing client as 404 rather than an empty list
        self.repository.clients.get(client_id).await?;
        self.repository.borrows.borrowed_books(client_id).await
    }

    /// All borrows referencing a book with their clients
    pub async fn borrowers(&self, isbn: &str) -> AppResult<Vec<Borrower>> {
        self.repository.books.get(isbn).await?;
        self.repository.borrows.borrowers(isbn).await
    }
}
