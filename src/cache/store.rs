//! Cache storage for the Book collection.
//!
//! Values are typed records cloned on read, so a cached snapshot handed to a
//! caller never aliases the slot contents.

use std::sync::RwLock;

use crate::domain::entities::BookRecord;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Process-wide cache slots for book reads.
///
/// Constructed once per process and injected into the services that need it;
/// tests call [`BookCacheStore::reset`] between cases. Absent slots yield
/// `None`, never an error.
pub struct BookCacheStore {
    books: RwLock<Option<Vec<BookRecord>>>,
    book: RwLock<Option<BookRecord>>,
    top_rated: RwLock<Option<Vec<BookRecord>>>,
}

impl BookCacheStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(None),
            book: RwLock::new(None),
            top_rated: RwLock::new(None),
        }
    }

    /// Snapshot of the full collection, if populated.
    pub fn books(&self) -> Option<Vec<BookRecord>> {
        rw_read(&self.books, SOURCE, "books").clone()
    }

    pub fn set_books(&self, value: Vec<BookRecord>) {
        *rw_write(&self.books, SOURCE, "set_books") = Some(value);
    }

    pub fn has_books(&self) -> bool {
        rw_read(&self.books, SOURCE, "has_books").is_some()
    }

    /// The single most-recently-fetched book, if any.
    pub fn single(&self) -> Option<BookRecord> {
        rw_read(&self.book, SOURCE, "single").clone()
    }

    pub fn set_single(&self, value: BookRecord) {
        *rw_write(&self.book, SOURCE, "set_single") = Some(value);
    }

    pub fn top_rated(&self) -> Option<Vec<BookRecord>> {
        rw_read(&self.top_rated, SOURCE, "top_rated").clone()
    }

    pub fn set_top_rated(&self, value: Vec<BookRecord>) {
        *rw_write(&self.top_rated, SOURCE, "set_top_rated") = Some(value);
    }

    /// Drop every slot. Used by tests and nothing else; production entries
    /// live for the process lifetime.
    pub fn reset(&self) {
        *rw_write(&self.books, SOURCE, "reset.books") = None;
        *rw_write(&self.book, SOURCE, "reset.book") = None;
        *rw_write(&self.top_rated, SOURCE, "reset.top_rated") = None;
    }
}

impl Default for BookCacheStore {
    fn default() -> Self {
        Self::new()
    }
}
