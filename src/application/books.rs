//! Book catalog service: the cached read paths, storage-first writes, and
//! best-effort cache maintenance.
//!
//! Reads decide per call between the cache slots and the document store
//! (`list` → `books` slot, `get` → `books` then `book`, `top` → `books` then
//! `top_rated`). Writes always hit storage first and only then patch the
//! cache through [`BookCacheSync`]; a cache patch can never fail the write.

use std::cmp::Ordering;
use std::sync::Arc;

use bytes::Bytes;
use metrics::counter;
use time::{Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::pagination::{Page, paginate};
use crate::application::repos::{AuthorsRepo, BooksRepo};
use crate::cache::{BookCacheStore, BookCacheSync};
use crate::domain::entities::{AuthorRecord, BookRecord, Review};
use crate::domain::reviews;

pub const TOP_BOOKS_LIMIT: usize = 3;

/// Fields accepted when creating a book. Authors start empty and are
/// assigned through the relation endpoints.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub publication_date: Date,
    pub description: String,
    pub genre: String,
    pub rating: f64,
}

/// Full replacement of the updatable fields, as the PUT contract requires.
#[derive(Debug, Clone)]
pub struct BookChanges {
    pub title: String,
    pub publication_date: Date,
    pub description: String,
    pub genre: String,
    pub rating: f64,
}

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BooksRepo>,
    authors: Arc<dyn AuthorsRepo>,
    cache: Arc<BookCacheStore>,
    sync: BookCacheSync,
}

impl BookService {
    pub fn new(
        books: Arc<dyn BooksRepo>,
        authors: Arc<dyn AuthorsRepo>,
        cache: Arc<BookCacheStore>,
    ) -> Self {
        let sync = BookCacheSync::new(cache.clone());
        Self {
            books,
            authors,
            cache,
            sync,
        }
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// List books with keyword filtering and fixed-size pagination.
    ///
    /// A warm `books` slot is the working set; a cold one triggers a full
    /// collection fetch that also warms the slot (unfiltered, so later
    /// keyword reads reuse it). The keyword is a case-sensitive substring
    /// match on the title.
    pub async fn list(&self, page: u32, keyword: Option<&str>) -> Result<Page<BookRecord>, AppError> {
        let working = match self.cache.books() {
            Some(cached) => {
                counter!("bibliotek_cache_hit_total", "path" => "list").increment(1);
                filter_by_title(cached, keyword)
            }
            None => {
                counter!("bibliotek_cache_miss_total", "path" => "list").increment(1);
                let all = self.books.find_all().await?;
                debug!(count = all.len(), "warming book collection slot from storage");
                self.cache.set_books(all.clone());
                filter_by_title(all, keyword)
            }
        };
        Ok(paginate(working, page))
    }

    /// Fetch a single book.
    ///
    /// Branches are exclusive and checked in order: collection slot, then
    /// single slot, then storage. A warm slot that lacks the id answers
    /// NotFound without consulting storage; tests pin this.
    pub async fn get(&self, id: Uuid) -> Result<BookRecord, AppError> {
        if let Some(cached) = self.cache.books() {
            counter!("bibliotek_cache_hit_total", "path" => "detail").increment(1);
            return cached
                .into_iter()
                .find(|book| book.id == id)
                .ok_or_else(|| AppError::not_found("Book"));
        }

        if let Some(single) = self.cache.single() {
            counter!("bibliotek_cache_hit_total", "path" => "detail").increment(1);
            return if single.id == id {
                Ok(single)
            } else {
                Err(AppError::not_found("Book"))
            };
        }

        counter!("bibliotek_cache_miss_total", "path" => "detail").increment(1);
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        self.cache.set_single(book.clone());
        Ok(book)
    }

    /// The top three books by rating.
    ///
    /// A warm collection slot is sorted on the fly; otherwise a stored
    /// `top_rated` snapshot is returned in its stored order (no re-sort);
    /// otherwise storage answers and warms `top_rated`. The snapshot is
    /// never invalidated by rating changes.
    pub async fn top(&self) -> Result<Vec<BookRecord>, AppError> {
        if let Some(mut cached) = self.cache.books() {
            counter!("bibliotek_cache_hit_total", "path" => "top").increment(1);
            cached.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
            cached.truncate(TOP_BOOKS_LIMIT);
            return Ok(cached);
        }

        if let Some(top) = self.cache.top_rated() {
            counter!("bibliotek_cache_hit_total", "path" => "top").increment(1);
            return Ok(top);
        }

        counter!("bibliotek_cache_miss_total", "path" => "top").increment(1);
        let top = self.books.top_by_rating(TOP_BOOKS_LIMIT).await?;
        self.cache.set_top_rated(top.clone());
        Ok(top)
    }

    /// Resolve a book's author id list into records, skipping dangling ids.
    pub async fn resolve_authors(&self, book: &BookRecord) -> Result<Vec<AuthorRecord>, AppError> {
        let mut resolved = Vec::with_capacity(book.author_ids.len());
        for author_id in &book.author_ids {
            if let Some(author) = self.authors.find_by_id(*author_id).await? {
                resolved.push(author);
            }
        }
        Ok(resolved)
    }

    // ------------------------------------------------------------------
    // Write path (storage first, cache second)
    // ------------------------------------------------------------------

    pub async fn create(&self, new: NewBook) -> Result<BookRecord, AppError> {
        let now = OffsetDateTime::now_utc();
        let book = BookRecord {
            id: Uuid::new_v4(),
            title: new.title,
            publication_date: new.publication_date,
            description: new.description,
            genre: new.genre,
            rating: new.rating,
            author_ids: Vec::new(),
            image: None,
            reviews: Vec::new(),
            num_reviews: 0,
            created_at: now,
            updated_at: now,
        };
        let created = self.books.save(book).await?;
        self.sync.on_create(&created);
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, changes: BookChanges) -> Result<BookRecord, AppError> {
        let mut book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        book.title = changes.title;
        book.publication_date = changes.publication_date;
        book.description = changes.description;
        book.genre = changes.genre;
        book.rating = changes.rating;
        book.updated_at = OffsetDateTime::now_utc();

        let updated = self.books.save(book).await?;
        self.sync.on_update(id, &updated);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        self.books.delete_one(id).await?;
        self.sync.on_delete(id);
        Ok(())
    }

    /// Append a review; the rating mean and review count are recomputed in
    /// the same save.
    pub async fn add_review(&self, id: Uuid, review: Review) -> Result<BookRecord, AppError> {
        let mut book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        let totals = reviews::append_review(&mut book.reviews, review, "Book")?;
        book.rating = totals.rating;
        book.num_reviews = totals.num_reviews;
        book.updated_at = OffsetDateTime::now_utc();

        let updated = self.books.save(book).await?;
        self.sync.on_update(id, &updated);
        Ok(updated)
    }

    pub async fn assign_author(&self, book_id: Uuid, author_id: Uuid) -> Result<BookRecord, AppError> {
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        self.authors
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::not_found("Author"))?;

        if book.author_ids.contains(&author_id) {
            return Err(AppError::conflict("author already assigned to book"));
        }

        book.author_ids.push(author_id);
        book.updated_at = OffsetDateTime::now_utc();
        let updated = self.books.save(book).await?;
        self.sync.on_update(book_id, &updated);
        Ok(updated)
    }

    pub async fn remove_author(&self, book_id: Uuid, author_id: Uuid) -> Result<BookRecord, AppError> {
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        if !book.author_ids.contains(&author_id) {
            return Err(AppError::not_found("Author"));
        }

        book.author_ids.retain(|id| *id != author_id);
        book.updated_at = OffsetDateTime::now_utc();
        let updated = self.books.save(book).await?;
        self.sync.on_update(book_id, &updated);
        Ok(updated)
    }

    pub async fn set_image(&self, id: Uuid, png: Bytes) -> Result<(), AppError> {
        let mut book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        book.image = Some(png);
        book.updated_at = OffsetDateTime::now_utc();
        let updated = self.books.save(book).await?;
        self.sync.on_update(id, &updated);
        Ok(())
    }

    pub async fn clear_image(&self, id: Uuid) -> Result<(), AppError> {
        let mut book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        book.image = None;
        book.updated_at = OffsetDateTime::now_utc();
        let updated = self.books.save(book).await?;
        self.sync.on_update(id, &updated);
        Ok(())
    }

    /// The stored cover image; NotFound covers both a missing book and a
    /// book without a cover.
    pub async fn image(&self, id: Uuid) -> Result<Bytes, AppError> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        book.image.ok_or_else(|| AppError::not_found("Book image"))
    }
}

fn filter_by_title(mut working: Vec<BookRecord>, keyword: Option<&str>) -> Vec<BookRecord> {
    if let Some(keyword) = keyword {
        working.retain(|book| book.title.contains(keyword));
    }
    working
}
