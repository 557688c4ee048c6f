//! Catalog service: book management

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.get_all().await
    }

    /// Get a book by ISBN
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.repository.books.get(isbn).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let book = Book {
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            items: book.items,
        };
        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, isbn: &str, update: UpdateBook) -> AppResult<Book> {
        self.repository.books.update(isbn, &update).await
    }

    /// Delete a book; rejected while it has active borrows
    pub async fn delete_book(&self, isbn: &str) -> AppResult<()> {
        self.repository.books.delete(isbn).await
    }
}
