//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod clients;
pub mod settings;
pub mod users;

use sqlx::{Pool, Sqlite};

use crate::error::AppError;

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub clients: clients::ClientsRepository,
    pub users: users::UsersRepository,
    pub borrows: borrows::BorrowsRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            clients: clients::ClientsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Map a UNIQUE constraint violation onto a Conflict with a readable
/// message; everything else stays a database error.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation => {
            AppError::Conflict(format!("{} already exists", what))
        }
        _ => AppError::Database(e),
    }
}
