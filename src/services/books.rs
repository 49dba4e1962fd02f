//! Book service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookPage},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

fn is_blank(id: &str) -> bool {
    id.trim().is_empty()
}

/// Reject an absent book or one that fails validation
pub fn require_book(book: Option<Book>) -> AppResult<Book> {
    let book = book.ok_or_else(|| AppError::InvalidArgument("Book is required".to_string()))?;
    book.validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;
    Ok(book)
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_page(&self, page_number: i64, page_size: i64) -> AppResult<Vec<Book>> {
        self.store.list_page(page_number, page_size).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.store.count().await
    }

    /// One page of books plus the total count, for client-side pagination
    pub async fn list(&self, page_number: i64, page_size: i64) -> AppResult<BookPage> {
        let books = self.list_page(page_number, page_size).await?;
        let total_books = self.count().await?;
        Ok(BookPage { books, total_books })
    }

    /// Get a book by id. An empty id is answered with `None` without touching the store.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        if is_blank(id) {
            return Ok(None);
        }
        self.store.get_by_id(id).await
    }

    /// Create a book; the returned copy carries the store-assigned id
    pub async fn create(&self, book: Option<Book>) -> AppResult<Book> {
        let book = require_book(book)?;
        self.store.insert(book).await
    }

    /// Replace the book with this id. Does not check that it exists.
    pub async fn update(&self, id: &str, book: Option<Book>) -> AppResult<()> {
        if is_blank(id) {
            return Err(AppError::InvalidArgument("Book id is required".to_string()));
        }
        let book = require_book(book)?;
        self.store.replace(id, book).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if is_blank(id) {
            return Err(AppError::InvalidArgument("Book id is required".to_string()));
        }
        self.store.delete(id).await
    }

    /// Whether the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
