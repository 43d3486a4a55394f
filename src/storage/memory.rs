//! In-memory storage implementation
//!
//! Keeps books in a process-wide list. Useful for tests and for running the
//! server without a database file.

use std::sync::{Mutex, MutexGuard};
use crate::Result;
use crate::book::Book;
use super::BookStore;

#[derive(Debug, Default)]
struct Shelf {
    books: Vec<Book>,
    last_id: i64,
}

/// Mutex-guarded book list with store-assigned, never reused ids
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    shelf: Mutex<Shelf>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self) -> MutexGuard<'_, Shelf> {
        // A panic mid-operation leaves the list consistent: every mutation is
        // a single push, assignment or removal.
        self.shelf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BookStore for MemoryBookStore {
    fn list_all(&self) -> Result<Vec<Book>> {
        Ok(self.shelf().books.clone())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Book>> {
        Ok(self.shelf().books.iter().find(|b| b.id == id).cloned())
    }

    fn insert(&self, book: &Book) -> Result<i64> {
        let mut shelf = self.shelf();
        shelf.last_id += 1;
        let id = shelf.last_id;
        shelf.books.push(book.clone().with_id(id));
        Ok(id)
    }

    fn update_by_id(&self, id: i64, book: &Book) -> Result<usize> {
        let mut shelf = self.shelf();
        match shelf.books.iter_mut().find(|b| b.id == id) {
            Some(existing) => {
                *existing = book.clone().with_id(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<usize> {
        let mut shelf = self.shelf();
        let before = shelf.books.len();
        shelf.books.retain(|b| b.id != id);
        Ok(before - shelf.books.len())
    }
}
