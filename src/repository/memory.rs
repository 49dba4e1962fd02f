//! In-process book store.
//!
//! Keeps records in insertion order behind an async lock. Used for local
//! development (`database.backend = "memory"`) and by the test suite.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{checked_count, page_offset, BookStore};
use crate::{error::AppResult, models::Book};

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<IndexMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with persisted books; books without an id get one.
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|mut book| {
                let id = book.id.clone().unwrap_or_else(new_id);
                book.id = Some(id.clone());
                (id, book)
            })
            .collect();
        Self {
            books: RwLock::new(books),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn list_page(&self, page_number: i64, page_size: i64) -> AppResult<Vec<Book>> {
        let skip = usize::try_from(page_offset(page_number, page_size)?).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        Ok(self
            .books
            .read()
            .await
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        let len = self.books.read().await.len();
        checked_count(len as u64)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn insert(&self, mut book: Book) -> AppResult<Book> {
        let id = new_id();
        book.id = Some(id.clone());
        self.books.write().await.insert(id, book.clone());
        Ok(book)
    }

    async fn replace(&self, id: &str, mut book: Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        if let Some(existing) = books.get_mut(id) {
            book.id = Some(id.to_string());
            *existing = book;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        // shift_remove keeps the remaining records in insertion order
        self.books.write().await.shift_remove(id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
