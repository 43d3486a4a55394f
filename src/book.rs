//! Book record - the single entity served by the catalogue
//!
//! The JSON shape is `{ "id", "title", "year", "numberOfPages" }`. Every field
//! may be omitted or `null` on input and takes its default: an empty title is
//! then rejected by validation instead of by the decoder, integers become 0.

use serde::{Deserialize, Deserializer, Serialize};

/// A book as stored in the `books` table.
///
/// `id` is assigned by the store on insert. Any id supplied by a client is
/// ignored on create and overridden by the path on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_pages: i64,
}

impl Book {
    /// Create a book that has not been persisted yet (id 0)
    pub fn new(title: impl Into<String>, year: i64, number_of_pages: i64) -> Self {
        Self {
            id: 0,
            title: title.into(),
            year,
            number_of_pages,
        }
    }

    /// Copy of this book carrying the given id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
