//! SQLite storage implementation

use std::path::Path;
use std::time::Duration;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use crate::{Result, Error};
use crate::book::Book;
use super::{schema, BookStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed book storage.
///
/// Every operation checks out its own connection from the pool and hands it
/// back when the guard is dropped, whether the statement succeeded or not.
pub struct SqliteBookStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteBookStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, pool_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")
        });
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;
        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    ///
    /// Each in-memory connection is its own database, so the pool is capped
    /// at a single connection that is never retired.
    pub fn open_in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .build(SqliteConnectionManager::memory())?;
        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Helper to convert a row to a Book
    fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            year: row.get(2)?,
            number_of_pages: row.get(3)?,
        })
    }
}

impl BookStore for SqliteBookStore {
    fn list_all(&self) -> Result<Vec<Book>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, publication_year, pages FROM books ORDER BY id"
        )?;

        let books = stmt
            .query_map([], Self::row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(books)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Book>> {
        self.connection()?
            .query_row(
                "SELECT id, title, publication_year, pages FROM books WHERE id = ?1",
                [id],
                Self::row_to_book,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert(&self, book: &Book) -> Result<i64> {
        let conn = self.connection()?;
        let affected = conn.execute(
            "INSERT INTO books (title, publication_year, pages) VALUES (?1, ?2, ?3)",
            params![book.title, book.year, book.number_of_pages],
        )?;
        if affected == 0 {
            return Err(Error::NoRowsInserted);
        }
        Ok(conn.last_insert_rowid())
    }

    fn update_by_id(&self, id: i64, book: &Book) -> Result<usize> {
        let affected = self.connection()?.execute(
            "UPDATE books SET title = ?1, publication_year = ?2, pages = ?3 WHERE id = ?4",
            params![book.title, book.year, book.number_of_pages, id],
        )?;
        Ok(affected)
    }

    fn delete_by_id(&self, id: i64) -> Result<usize> {
        let affected = self
            .connection()?
            .execute("DELETE FROM books WHERE id = ?1", [id])?;
        Ok(affected)
    }
}
