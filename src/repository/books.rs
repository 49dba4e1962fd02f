//! MongoDB-backed book collection.
//!
//! Documents keep the layout of the existing collection: `_id` is an ObjectId
//! and fields are PascalCase (`Title`, `Author`, `Price`), with the price
//! stored as a decimal string.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson},
    options::ClientOptions,
    Client, Collection,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{checked_count, page_offset, BookStore};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::Book,
};

/// Stored form of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Author", default)]
    author: Option<String>,
    #[serde(rename = "Price", with = "rust_decimal::serde::str")]
    price: Decimal,
}

impl BookDocument {
    fn from_book(book: Book, id: Option<ObjectId>) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            price: book.price,
        }
    }
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Book {
            id: document.id.map(|oid| oid.to_hex()),
            title: document.title,
            author: document.author,
            price: document.price,
        }
    }
}

/// Ids that are not ObjectIds cannot match any stored document
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[derive(Clone)]
pub struct MongoBookStore {
    client: Client,
    database_name: String,
    books: Collection<BookDocument>,
}

impl MongoBookStore {
    /// Create the client once; it pools connections and is shared by all requests.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ClientOptions::parse(config.connection_string.as_str()).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)?;
        Ok(Self::new(
            client,
            &config.database_name,
            &config.books_collection_name,
        ))
    }

    pub fn new(client: Client, database_name: &str, collection_name: &str) -> Self {
        let books = client
            .database(database_name)
            .collection::<BookDocument>(collection_name);
        Self {
            client,
            database_name: database_name.to_string(),
            books,
        }
    }
}

#[async_trait::async_trait]
impl BookStore for MongoBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let documents: Vec<BookDocument> = self.books.find(doc! {}).await?.try_collect().await?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn list_page(&self, page_number: i64, page_size: i64) -> AppResult<Vec<Book>> {
        let skip = page_offset(page_number, page_size)?;
        let documents: Vec<BookDocument> = self
            .books
            .find(doc! {})
            .skip(skip)
            .limit(page_size)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        let raw = self.books.count_documents(doc! {}).await?;
        checked_count(raw)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let document = self.books.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Book::from))
    }

    async fn insert(&self, book: Book) -> AppResult<Book> {
        let mut document = BookDocument::from_book(book, None);
        let result = self.books.insert_one(&document).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => {
                document.id = Some(oid);
                Ok(document.into())
            }
            other => Err(AppError::Internal(format!(
                "Store returned a non-ObjectId key: {}",
                other
            ))),
        }
    }

    async fn replace(&self, id: &str, book: Book) -> AppResult<()> {
        let Some(oid) = parse_id(id) else {
            return Ok(());
        };
        let document = BookDocument::from_book(book, Some(oid));
        let result = self
            .books
            .replace_one(doc! { "_id": oid }, &document)
            .await?;
        if result.matched_count == 0 {
            tracing::debug!("Replace matched no book with id {}", id);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let Some(oid) = parse_id(id) else {
            return Ok(());
        };
        self.books.delete_one(doc! { "_id": oid }).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.database_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
