//! Write-path cache maintenance.
//!
//! Invoked after every successful book write, storage first. Maintenance is
//! best-effort: nothing here returns an error to the caller, since storage is
//! the source of truth and the cache merely avoids repeat full-collection
//! reads. Only the `books` slot is patched; the `book` and `top_rated` slots
//! are left to age out (see the module docs in `cache`).

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::BookRecord;

use super::store::BookCacheStore;

#[derive(Clone)]
pub struct BookCacheSync {
    store: Arc<BookCacheStore>,
}

impl BookCacheSync {
    pub fn new(store: Arc<BookCacheStore>) -> Self {
        Self { store }
    }

    /// Append a freshly created book to the cached collection.
    ///
    /// No-op when the slot is cold: the next list read repopulates from
    /// storage and picks the new book up implicitly.
    pub fn on_create(&self, created: &BookRecord) {
        let Some(mut cached) = self.store.books() else {
            return;
        };
        cached.push(created.clone());
        self.store.set_books(cached);
        debug!(book_id = %created.id, "cache: appended created book to collection slot");
    }

    /// Replace the cached element matching `id` with `updated`.
    ///
    /// An id with no cached counterpart leaves the slot untouched; silently
    /// corrupting the list here would poison every later cached read.
    pub fn on_update(&self, id: Uuid, updated: &BookRecord) {
        let Some(mut cached) = self.store.books() else {
            return;
        };
        match cached.iter().position(|book| book.id == id) {
            Some(index) => {
                cached[index] = updated.clone();
                self.store.set_books(cached);
                debug!(book_id = %id, "cache: replaced updated book in collection slot");
            }
            None => {
                warn!(
                    book_id = %id,
                    "cache: updated book missing from collection slot, leaving slot unchanged"
                );
            }
        }
    }

    /// Remove the cached element matching `id`.
    pub fn on_delete(&self, id: Uuid) {
        let Some(mut cached) = self.store.books() else {
            return;
        };
        cached.retain(|book| book.id != id);
        self.store.set_books(cached);
        debug!(book_id = %id, "cache: removed deleted book from collection slot");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use time::macros::date;
    use time::OffsetDateTime;

    use super::*;

    fn book(title: &str, rating: f64) -> BookRecord {
        BookRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            publication_date: date!(1900 - 01 - 01),
            description: String::new(),
            genre: "novel".to_string(),
            rating,
            author_ids: Vec::new(),
            image: None,
            reviews: Vec::new(),
            num_reviews: 0,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn ids(books: &[BookRecord]) -> HashSet<Uuid> {
        books.iter().map(|b| b.id).collect()
    }

    #[test]
    fn create_appends_when_slot_warm() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());
        store.set_books(vec![book("Moby Dick", 4.0)]);

        let created = book("Emma", 3.0);
        sync.on_create(&created);

        let cached = store.books().expect("books slot");
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[1].id, created.id);
    }

    #[test]
    fn create_is_noop_when_slot_cold() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());

        sync.on_create(&book("Emma", 3.0));

        assert!(store.books().is_none());
    }

    #[test]
    fn update_replaces_matching_element_in_place() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());
        let mut target = book("Moby Dick", 4.0);
        store.set_books(vec![book("Emma", 3.0), target.clone()]);

        target.title = "Moby-Dick; or, The Whale".to_string();
        sync.on_update(target.id, &target);

        let cached = store.books().expect("books slot");
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[1].title, "Moby-Dick; or, The Whale");
        assert_eq!(cached[0].title, "Emma");
    }

    #[test]
    fn update_with_unknown_id_leaves_slot_unchanged() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());
        let original = vec![book("Emma", 3.0), book("Moby Dick", 4.0)];
        store.set_books(original.clone());

        sync.on_update(Uuid::new_v4(), &book("Phantom", 1.0));

        assert_eq!(store.books().expect("books slot"), original);
    }

    #[test]
    fn delete_removes_matching_element() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());
        let doomed = book("Emma", 3.0);
        store.set_books(vec![doomed.clone(), book("Moby Dick", 4.0)]);

        sync.on_delete(doomed.id);

        let cached = store.books().expect("books slot");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].title, "Moby Dick");
    }

    #[test]
    fn sync_never_touches_single_or_top_rated_slots() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());
        let stale_single = book("Dracula", 2.0);
        let stale_top = vec![book("Emma", 5.0)];
        store.set_books(vec![stale_single.clone()]);
        store.set_single(stale_single.clone());
        store.set_top_rated(stale_top.clone());

        let mut updated = stale_single.clone();
        updated.rating = 1.0;
        sync.on_update(updated.id, &updated);
        sync.on_delete(updated.id);
        sync.on_create(&book("Persuasion", 4.0));

        // Known staleness gap, preserved deliberately.
        assert_eq!(store.single().expect("book slot"), stale_single);
        assert_eq!(store.top_rated().expect("top slot"), stale_top);
    }

    /// Any on_create/on_update/on_delete sequence applied to a warm slot
    /// keeps its id set equal to a reference list that mirrors the same
    /// operations.
    #[test]
    fn sequences_mirror_a_reference_list() {
        let store = Arc::new(BookCacheStore::new());
        let sync = BookCacheSync::new(store.clone());

        let mut reference = vec![book("A", 1.0), book("B", 2.0), book("C", 3.0)];
        store.set_books(reference.clone());

        // create
        let d = book("D", 4.0);
        sync.on_create(&d);
        reference.push(d);
        assert_eq!(ids(&store.books().expect("slot")), ids(&reference));

        // update
        let mut b = reference[1].clone();
        b.rating = 5.0;
        sync.on_update(b.id, &b);
        reference[1] = b;
        assert_eq!(ids(&store.books().expect("slot")), ids(&reference));

        // delete
        let gone = reference.remove(0);
        sync.on_delete(gone.id);
        assert_eq!(ids(&store.books().expect("slot")), ids(&reference));

        // delete of an id never cached
        sync.on_delete(Uuid::new_v4());
        assert_eq!(ids(&store.books().expect("slot")), ids(&reference));
    }
}
