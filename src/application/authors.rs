//! Author service: uncached list/get/top, CRUD, reviews, book relations,
//! and avatar storage. The author read path goes straight to the document
//! store on every call; only the book collection is cached.

use std::sync::Arc;

use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::pagination::{Page, paginate};
use crate::application::repos::{AuthorsRepo, BooksRepo};
use crate::domain::entities::{AuthorRecord, BookRecord, Review};
use crate::domain::reviews;

pub const TOP_AUTHORS_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub bio: String,
}

#[derive(Debug, Clone)]
pub struct AuthorChanges {
    pub name: String,
    pub bio: String,
}

#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorsRepo>,
    books: Arc<dyn BooksRepo>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorsRepo>, books: Arc<dyn BooksRepo>) -> Self {
        Self { authors, books }
    }

    /// List authors, keyword filtering by case-sensitive substring on name.
    pub async fn list(&self, page: u32, keyword: Option<&str>) -> Result<Page<AuthorRecord>, AppError> {
        let mut working = self.authors.find_all().await?;
        if let Some(keyword) = keyword {
            working.retain(|author| author.name.contains(keyword));
        }
        Ok(paginate(working, page))
    }

    pub async fn get(&self, id: Uuid) -> Result<AuthorRecord, AppError> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Author"))
    }

    pub async fn top(&self) -> Result<Vec<AuthorRecord>, AppError> {
        Ok(self.authors.top_by_rating(TOP_AUTHORS_LIMIT).await?)
    }

    /// Resolve an author's book id list into records, skipping dangling ids.
    pub async fn resolve_books(&self, author: &AuthorRecord) -> Result<Vec<BookRecord>, AppError> {
        let mut resolved = Vec::with_capacity(author.book_ids.len());
        for book_id in &author.book_ids {
            if let Some(book) = self.books.find_by_id(*book_id).await? {
                resolved.push(book);
            }
        }
        Ok(resolved)
    }

    pub async fn create(&self, new: NewAuthor) -> Result<AuthorRecord, AppError> {
        let now = OffsetDateTime::now_utc();
        let author = AuthorRecord {
            id: Uuid::new_v4(),
            name: new.name,
            bio: new.bio,
            avatar: None,
            book_ids: Vec::new(),
            reviews: Vec::new(),
            rating: 0.0,
            num_reviews: 0,
            created_at: now,
            updated_at: now,
        };
        Ok(self.authors.save(author).await?)
    }

    pub async fn update(&self, id: Uuid, changes: AuthorChanges) -> Result<AuthorRecord, AppError> {
        let mut author = self.get(id).await?;
        author.name = changes.name;
        author.bio = changes.bio;
        author.updated_at = OffsetDateTime::now_utc();
        Ok(self.authors.save(author).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        self.authors.delete_one(id).await?;
        Ok(())
    }

    pub async fn add_review(&self, id: Uuid, review: Review) -> Result<AuthorRecord, AppError> {
        let mut author = self.get(id).await?;

        let totals = reviews::append_review(&mut author.reviews, review, "Author")?;
        author.rating = totals.rating;
        author.num_reviews = totals.num_reviews;
        author.updated_at = OffsetDateTime::now_utc();

        Ok(self.authors.save(author).await?)
    }

    pub async fn assign_book(&self, author_id: Uuid, book_id: Uuid) -> Result<AuthorRecord, AppError> {
        let mut author = self.get(author_id).await?;
        self.books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        if author.book_ids.contains(&book_id) {
            return Err(AppError::conflict("book already assigned to author"));
        }

        author.book_ids.push(book_id);
        author.updated_at = OffsetDateTime::now_utc();
        Ok(self.authors.save(author).await?)
    }

    pub async fn remove_book(&self, author_id: Uuid, book_id: Uuid) -> Result<AuthorRecord, AppError> {
        let mut author = self.get(author_id).await?;

        if !author.book_ids.contains(&book_id) {
            return Err(AppError::not_found("Book"));
        }

        author.book_ids.retain(|id| *id != book_id);
        author.updated_at = OffsetDateTime::now_utc();
        Ok(self.authors.save(author).await?)
    }

    pub async fn set_avatar(&self, id: Uuid, png: Bytes) -> Result<(), AppError> {
        let mut author = self.get(id).await?;
        author.avatar = Some(png);
        author.updated_at = OffsetDateTime::now_utc();
        self.authors.save(author).await?;
        Ok(())
    }

    pub async fn clear_avatar(&self, id: Uuid) -> Result<(), AppError> {
        let mut author = self.get(id).await?;
        author.avatar = None;
        author.updated_at = OffsetDateTime::now_utc();
        self.authors.save(author).await?;
        Ok(())
    }

    pub async fn avatar(&self, id: Uuid) -> Result<Bytes, AppError> {
        let author = self.get(id).await?;
        author
            .avatar
            .ok_or_else(|| AppError::not_found("Author avatar"))
    }
}
