//! Books repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, UpdateBook},
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all books
    pub async fn get_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get a book by ISBN, as an optional
    pub async fn find(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Get a book by ISBN
    pub async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.find(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Insert a new book. A duplicate ISBN hits the primary key constraint
    /// and comes back as Conflict.
    pub async fn create(&self, book: &Book) -> AppResult<Book> {
        sqlx::query("INSERT INTO books (isbn, title, author, items) VALUES ($1, $2, $3, $4)")
            .bind(&book.isbn)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.items)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "A book with this ISBN"))?;
        Ok(book.clone())
    }

    /// Update title/author/items of an existing book. The copy count can
    /// never drop below the active borrow count, so the check and the
    /// update run in one transaction.
    pub async fn update(&self, isbn: &str, update: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE book_isbn = $1 AND returned = 0",
        )
        .bind(isbn)
        .fetch_one(&mut *tx)
        .await?;

        if update.items < active {
            return Err(AppError::Conflict(format!(
                "Book {} has {} active borrow(s); cannot reduce copies to {}",
                isbn, active, update.items
            )));
        }

        let result = sqlx::query(
            "UPDATE books SET title = $1, author = $2, items = $3 WHERE isbn = $4",
        )
        .bind(&update.title)
        .bind(&update.author)
        .bind(update.items)
        .bind(isbn)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                isbn
            )));
        }

        tx.commit().await?;
        self.get(isbn).await
    }

    /// Delete a book. Rejected while active borrows reference it; returned
    /// history rows are removed with the book via FK cascade. Check and
    /// delete run in one transaction.
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE book_isbn = $1 AND returned = 0",
        )
        .bind(isbn)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Book {} still has {} active borrow(s)",
                isbn, active
            )));
        }

        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                isbn
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}
