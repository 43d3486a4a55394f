//! # Bookshelf - Book catalogue REST service
//!
//! A small CRUD service for a single `Book` resource, split in three layers:
//! - Storage: parameterized SQL against a `books` table (or an in-memory list)
//! - Service: validation and "not found" normalisation
//! - Server: HTTP routing and status mapping

pub mod book;
pub mod storage;
pub mod service;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use book::Book;
pub use storage::{BookStore, MemoryBookStore, SqliteBookStore};
pub use service::{BookService, ValidationError};

/// Result type alias for Bookshelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bookshelf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Insert failed, no rows affected")]
    NoRowsInserted,

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
