//! Data models for the Bookstore

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookListQuery, BookPage};
