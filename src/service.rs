//! Book service - validation on top of a [`BookStore`]
//!
//! Mutations are validated before the store is touched; row counts coming
//! back from the store are turned into plain `bool`s.

use std::sync::Arc;
use crate::Result;
use crate::book::Book;
use crate::storage::BookStore;

/// A business rule violated by client-supplied book data
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Book title cannot be null/blank.")]
    BlankTitle,

    #[error("Year cannot be negative.")]
    NegativeYear,

    #[error("Number of pages cannot be negative.")]
    NegativePageCount,
}

/// Whitespace as the catalogue has always counted it: Unicode white space
/// except the no-break spaces and NEL, plus the ASCII separators U+001C..U+001F.
fn is_title_whitespace(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        other => other.is_whitespace(),
    }
}

fn is_blank(title: &str) -> bool {
    title.chars().all(is_title_whitespace)
}

/// Check a book against the catalogue rules.
///
/// Rules are checked in field order (title, year, pages) and the first
/// violation is returned.
pub fn validate_book(book: &Book) -> std::result::Result<(), ValidationError> {
    if is_blank(&book.title) {
        return Err(ValidationError::BlankTitle);
    }
    if book.year < 0 {
        return Err(ValidationError::NegativeYear);
    }
    if book.number_of_pages < 0 {
        return Err(ValidationError::NegativePageCount);
    }
    Ok(())
}

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn list_all(&self) -> Result<Vec<Book>> {
        self.store.list_all()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Book>> {
        self.store.find_by_id(id)
    }

    /// Validate and insert a book, returning its new id
    pub fn create(&self, book: &Book) -> Result<i64> {
        Self::check(book)?;
        let id = self.store.insert(book)?;
        tracing::debug!("Created book {} ({:?})", id, book.title);
        Ok(id)
    }

    /// Validate and replace the book with `id`; false if there is no such book
    pub fn update(&self, id: i64, book: &Book) -> Result<bool> {
        Self::check(book)?;
        let updated = self.store.update_by_id(id, book)? > 0;
        tracing::debug!("Update of book {}: {}", id, if updated { "applied" } else { "not found" });
        Ok(updated)
    }

    /// Remove the book with `id`; false if there is no such book
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.store.delete_by_id(id)? > 0;
        tracing::debug!("Delete of book {}: {}", id, if deleted { "applied" } else { "not found" });
        Ok(deleted)
    }

    fn check(book: &Book) -> Result<()> {
        validate_book(book).map_err(|e| {
            tracing::debug!("Rejected book {:?}: {}", book.title, e);
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBookStore, SqliteBookStore};
    use crate::Error;

    fn service() -> BookService {
        BookService::new(Arc::new(SqliteBookStore::open_in_memory().unwrap()))
    }

    fn validation_of(result: Result<impl std::fmt::Debug>) -> ValidationError {
        match result {
            Err(Error::Validation(e)) => e,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_then_get_round_trips() {
        let service = service();
        let input = Book::new("Dune", 1965, 412);

        let id = service.create(&input).unwrap();
        assert_eq!(service.get_by_id(id).unwrap(), Some(input.with_id(id)));
    }

    #[test]
    fn test_missing_ids_report_absence() {
        let service = service();

        assert_eq!(service.get_by_id(9999).unwrap(), None);
        assert!(!service.update(9999, &Book::new("X", 2000, 10)).unwrap());
        assert!(!service.delete(9999).unwrap());
    }

    #[test]
    fn test_delete_twice() {
        let service = service();
        let id = service.create(&Book::new("Once", 2000, 1)).unwrap();

        assert!(service.delete(id).unwrap());
        assert!(!service.delete(id).unwrap());
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let service = service();
        service.create(&Book::new("First", 1990, 100)).unwrap();
        let id = service.create(&Book::new("Second", 1991, 200)).unwrap();
        assert_eq!(id, 2);

        assert!(service.update(2, &Book::new("X", 2000, 10)).unwrap());
        assert_eq!(service.get_by_id(2).unwrap(), Some(Book::new("X", 2000, 10).with_id(2)));
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(validate_book(&Book::new("Ok", 0, 0)), Ok(()));
        assert_eq!(validate_book(&Book::new("", 2000, 10)), Err(ValidationError::BlankTitle));
        assert_eq!(validate_book(&Book::new(" \t\n", 2000, 10)), Err(ValidationError::BlankTitle));
        assert_eq!(validate_book(&Book::new("\u{1F}", 2000, 10)), Err(ValidationError::BlankTitle));
        assert_eq!(validate_book(&Book::new("\u{2003}\u{3000}", 2000, 10)), Err(ValidationError::BlankTitle));
        assert_eq!(validate_book(&Book::new("\u{A0}", 2000, 10)), Ok(()));
        assert_eq!(validate_book(&Book::new("\u{202F}", 2000, 10)), Ok(()));
        assert_eq!(validate_book(&Book::new("T", -1, 10)), Err(ValidationError::NegativeYear));
        assert_eq!(validate_book(&Book::new("T", 2000, -1)), Err(ValidationError::NegativePageCount));
    }

    #[test]
    fn test_first_violation_wins() {
        assert_eq!(validate_book(&Book::new("", -1, -1)), Err(ValidationError::BlankTitle));
        assert_eq!(validate_book(&Book::new("T", -1, -1)), Err(ValidationError::NegativeYear));
        assert_eq!(
            ValidationError::NegativePageCount.to_string(),
            "Number of pages cannot be negative."
        );
    }

    #[test]
    fn test_invalid_books_never_reach_storage() {
        let store = Arc::new(MemoryBookStore::new());
        let service = BookService::new(store.clone());
        let id = service.create(&Book::new("Kept", 2000, 10)).unwrap();

        assert_eq!(validation_of(service.create(&Book::new("  ", 2000, 10))), ValidationError::BlankTitle);
        assert_eq!(validation_of(service.create(&Book::new("T", -3, 10))), ValidationError::NegativeYear);
        assert_eq!(validation_of(service.update(id, &Book::new("T", 2000, -3))), ValidationError::NegativePageCount);
        assert_eq!(validation_of(service.update(9999, &Book::new("", 2000, 10))), ValidationError::BlankTitle);

        assert_eq!(store.list_all().unwrap(), vec![Book::new("Kept", 2000, 10).with_id(id)]);
    }
}
