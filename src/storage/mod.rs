//! Storage Layer - book persistence
//!
//! System of record is SQLite with a single table:
//! - books(id, title, publication_year, pages)
//!
//! An in-memory backend honours the same contract for running without a
//! database file.

pub mod schema;
pub mod sqlite;
pub mod memory;

pub use sqlite::SqliteBookStore;
pub use memory::MemoryBookStore;

use std::sync::Arc;
use crate::Result;
use crate::book::Book;
use crate::config::{Backend, DatabaseConfig};

/// CRUD operations over the authoritative book collection.
///
/// Implementations enforce no business rules: whatever they are given is
/// stored. Row counts returned by `update_by_id` and `delete_by_id` are 0 when
/// no book has the id, 1 otherwise.
pub trait BookStore: Send + Sync {
    /// All books in the store's natural order
    fn list_all(&self) -> Result<Vec<Book>>;

    /// Look up a single book
    fn find_by_id(&self, id: i64) -> Result<Option<Book>>;

    /// Insert a book, ignoring its `id`, and return the generated id
    fn insert(&self, book: &Book) -> Result<i64>;

    /// Replace title, year and page count of the book with `id`
    fn update_by_id(&self, id: i64, book: &Book) -> Result<usize>;

    /// Remove the book with `id`
    fn delete_by_id(&self, id: i64) -> Result<usize>;
}

/// Open the backend selected by the configuration
pub fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn BookStore>> {
    config.prepare_storage()?;
    match config.backend {
        Backend::Sqlite => {
            tracing::info!("Opening SQLite store at {:?} (pool size {})", config.path, config.pool_size);
            Ok(Arc::new(SqliteBookStore::open(&config.path, config.pool_size)?))
        }
        Backend::Memory => {
            tracing::info!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryBookStore::new()))
        }
    }
}
