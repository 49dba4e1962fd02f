//! Repository layer for record store operations

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::{AppError, AppResult},
    models::Book,
};

pub use books::MongoBookStore;
pub use memory::MemoryBookStore;

/// Typed CRUD access to the book collection.
///
/// Implementations never check existence before writing: `replace` and
/// `delete` on an unknown id succeed without effect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every record, in store-defined order
    async fn list_all(&self) -> AppResult<Vec<Book>>;

    /// Records of the 1-based page `page_number`, at most `page_size` of them
    async fn list_page(&self, page_number: i64, page_size: i64) -> AppResult<Vec<Book>>;

    /// Total number of records
    async fn count(&self) -> AppResult<i64>;

    /// The record with this id, or `None` if there is none
    async fn get_by_id(&self, id: &str) -> AppResult<Option<Book>>;

    /// Persist a new record and return it with its store-assigned id
    async fn insert(&self, book: Book) -> AppResult<Book>;

    /// Overwrite the record with this id
    async fn replace(&self, id: &str, book: Book) -> AppResult<()>;

    /// Remove the record with this id
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Number of records to skip for a 1-based page
pub fn page_offset(page_number: i64, page_size: i64) -> AppResult<u64> {
    if page_number < 1 || page_size < 1 {
        return Err(AppError::InvalidArgument(format!(
            "pageNumber and pageSize must be positive (got {} and {})",
            page_number, page_size
        )));
    }
    (page_number - 1)
        .checked_mul(page_size)
        .and_then(|offset| u64::try_from(offset).ok())
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "Page {} of size {} is out of range",
                page_number, page_size
            ))
        })
}

/// Convert a raw store count into the API's count type
pub fn checked_count(raw: u64) -> AppResult<i64> {
    i64::try_from(raw).map_err(|_| AppError::Overflow(raw))
}

/// Open the configured record store
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn BookStore>> {
    let store: Arc<dyn BookStore> = match config.backend {
        StoreBackend::Mongodb => Arc::new(MongoBookStore::connect(config).await?),
        StoreBackend::Memory => Arc::new(MemoryBookStore::new()),
    };
    Ok(store)
}
