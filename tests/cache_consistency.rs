//! Service-level tests of the book cache behavior: warm/cold branching,
//! write-through maintenance, and the staleness gaps that are part of the
//! observable contract.

use std::sync::Arc;

use time::macros::date;
use uuid::Uuid;

use bibliotek::application::books::{BookChanges, BookService, NewBook};
use bibliotek::application::error::AppError;
use bibliotek::application::repos::{AuthorsRepo, BooksRepo};
use bibliotek::cache::BookCacheStore;
use bibliotek::domain::entities::Review;
use bibliotek::domain::error::DomainError;
use bibliotek::infra::memory::MemoryStore;

fn build_service() -> (BookService, Arc<MemoryStore>, Arc<BookCacheStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(BookCacheStore::new());
    let books: Arc<dyn BooksRepo> = store.clone();
    let authors: Arc<dyn AuthorsRepo> = store.clone();
    let service = BookService::new(books, authors, cache.clone());
    (service, store, cache)
}

fn new_book(title: &str, rating: f64) -> NewBook {
    NewBook {
        title: title.to_string(),
        publication_date: date!(1900 - 01 - 01),
        description: format!("{title} description"),
        genre: "novel".to_string(),
        rating,
    }
}

fn review(rating: u8) -> Review {
    Review {
        user_id: Uuid::new_v4(),
        reviewer_name: "reader".to_string(),
        rating,
        comment: String::new(),
        created_at: time::OffsetDateTime::now_utc(),
    }
}

fn assert_not_found(err: AppError) {
    assert!(
        matches!(err, AppError::Domain(DomainError::NotFound { .. })),
        "expected NotFound, got {err:?}"
    );
}

#[tokio::test]
async fn list_warms_collection_slot_and_writes_keep_it_consistent() {
    let (service, _store, cache) = build_service();

    let a = service.create(new_book("A", 1.0)).await.unwrap();
    assert!(cache.books().is_none(), "create on a cold slot stays cold");

    // First list warms the slot.
    let page = service.list(1, None).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(cache.has_books());

    // Create appends to the warm slot.
    let b = service.create(new_book("B", 2.0)).await.unwrap();
    let cached = cache.books().unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[1].id, b.id);

    // Update replaces in place.
    service
        .update(
            a.id,
            BookChanges {
                title: "A revised".to_string(),
                publication_date: a.publication_date,
                description: a.description.clone(),
                genre: a.genre.clone(),
                rating: a.rating,
            },
        )
        .await
        .unwrap();
    let cached = cache.books().unwrap();
    assert_eq!(cached[0].title, "A revised");

    // Delete removes from the slot.
    service.delete(b.id).await.unwrap();
    let cached = cache.books().unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, a.id);
}

#[tokio::test]
async fn list_serves_from_warm_slot_without_touching_storage() {
    let (service, store, cache) = build_service();

    service.create(new_book("Moby Dick", 4.0)).await.unwrap();
    service.list(1, None).await.unwrap();

    // Bypass the service and mutate storage directly; a warm slot must not
    // notice.
    let phantom = service.create(new_book("Phantom", 1.0)).await.unwrap();
    BooksRepo::delete_one(store.as_ref(), phantom.id)
        .await
        .unwrap();

    let page = service.list(1, None).await.unwrap();
    let titles: Vec<&str> = page.items.iter().map(|b| b.title.as_str()).collect();
    assert!(titles.contains(&"Phantom"), "slot still carries the record");
    assert_eq!(cache.books().unwrap().len(), 2);
}

#[tokio::test]
async fn keyword_filters_warm_slot_case_sensitively() {
    let (service, _store, _cache) = build_service();

    service
        .create(new_book("Harry Potter and the Philosopher's Stone", 4.0))
        .await
        .unwrap();
    service.create(new_book("Moby Dick", 4.0)).await.unwrap();
    service.list(1, None).await.unwrap();

    let hits = service.list(1, Some("Harry")).await.unwrap();
    assert_eq!(hits.items.len(), 1);

    let misses = service.list(1, Some("harry")).await.unwrap();
    assert!(misses.items.is_empty());
}

#[tokio::test]
async fn pagination_splits_five_books_three_then_two() {
    let (service, _store, _cache) = build_service();

    for i in 0..5 {
        service.create(new_book(&format!("Book {i}"), 1.0)).await.unwrap();
    }

    let first = service.list(1, None).await.unwrap();
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.page, 1);
    assert_eq!(first.pages, 2);

    let second = service.list(2, None).await.unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.pages, 2);
}

#[tokio::test]
async fn get_prefers_collection_slot_and_answers_not_found_from_it() {
    let (service, _store, cache) = build_service();

    let present = service.create(new_book("Present", 3.0)).await.unwrap();
    let absent = service.create(new_book("Absent", 3.0)).await.unwrap();

    service.list(1, None).await.unwrap();
    // Shrink the warm slot behind the service's back.
    cache.set_books(
        cache
            .books()
            .unwrap()
            .into_iter()
            .filter(|b| b.id == present.id)
            .collect(),
    );

    assert_eq!(service.get(present.id).await.unwrap().id, present.id);
    // The record exists in storage but the warm slot answers first.
    assert_not_found(service.get(absent.id).await.unwrap_err());
}

#[tokio::test]
async fn single_slot_masks_storage_until_it_matches() {
    let (service, _store, _cache) = build_service();

    let first = service.create(new_book("First", 3.0)).await.unwrap();
    let second = service.create(new_book("Second", 3.0)).await.unwrap();

    // Cold cache: storage answers and warms the single slot.
    assert_eq!(service.get(first.id).await.unwrap().id, first.id);

    // The single slot holds `first`, so `second` is invisible despite being
    // in storage.
    assert_not_found(service.get(second.id).await.unwrap_err());

    // The matching id still resolves from the slot.
    assert_eq!(service.get(first.id).await.unwrap().id, first.id);
}

#[tokio::test]
async fn top_sorts_warm_collection_slot_on_the_fly() {
    let (service, _store, _cache) = build_service();

    for (title, rating) in [("W", 2.0), ("X", 5.0), ("Y", 3.0), ("Z", 4.0)] {
        service.create(new_book(title, rating)).await.unwrap();
    }
    service.list(1, None).await.unwrap();

    let top = service.top().await.unwrap();
    let ratings: Vec<f64> = top.iter().map(|b| b.rating).collect();
    assert_eq!(ratings, vec![5.0, 4.0, 3.0]);
}

#[tokio::test]
async fn top_rated_snapshot_survives_rating_changes() {
    let (service, _store, cache) = build_service();

    let low = service.create(new_book("Low", 1.0)).await.unwrap();
    service.create(new_book("High", 5.0)).await.unwrap();

    // Cold cache: storage answers and warms `top_rated`.
    let snapshot = service.top().await.unwrap();
    assert_eq!(snapshot[0].title, "High");

    // Rating writes patch only the collection slot (cold here), so the
    // snapshot is served unchanged.
    service
        .update(
            low.id,
            BookChanges {
                title: "Low".to_string(),
                publication_date: low.publication_date,
                description: low.description.clone(),
                genre: low.genre.clone(),
                rating: 9.9,
            },
        )
        .await
        .unwrap();

    let stale = service.top().await.unwrap();
    assert_eq!(stale[0].title, "High");
    assert!(cache.top_rated().unwrap().iter().all(|b| b.rating != 9.9));
}

#[tokio::test]
async fn reviews_recompute_mean_and_reject_duplicate_reviewer() {
    let (service, _store, _cache) = build_service();

    let book = service.create(new_book("Reviewed", 0.0)).await.unwrap();

    let first = review(5);
    let updated = service.add_review(book.id, first.clone()).await.unwrap();
    assert_eq!(updated.rating, 5.0);
    assert_eq!(updated.num_reviews, 1);

    let updated = service.add_review(book.id, review(2)).await.unwrap();
    assert_eq!(updated.rating, 3.5);
    assert_eq!(updated.num_reviews, 2);

    let mut dup = review(4);
    dup.user_id = first.user_id;
    let err = service.add_review(book.id, dup).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::Conflict { .. })
    ));
}

#[tokio::test]
async fn review_on_warm_slot_updates_cached_rating() {
    let (service, _store, cache) = build_service();

    let book = service.create(new_book("Reviewed", 0.0)).await.unwrap();
    service.list(1, None).await.unwrap();

    service.add_review(book.id, review(4)).await.unwrap();

    let cached = cache.books().unwrap();
    assert_eq!(cached[0].rating, 4.0);
    assert_eq!(cached[0].num_reviews, 1);
}
