//! Repository traits describing the document-store collaborator.
//!
//! Persistence is an external collaborator here: the services only need the
//! document-store verbs below (find, find-by-id, save-as-upsert, delete-one,
//! plus a few per-collection lookups). Relation population is done in the
//! service layer by resolving id lists through these traits.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, BookRecord, TokenRecord, UserRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("record not found")]
    NotFound,
}

#[async_trait]
pub trait BooksRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<BookRecord>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepoError>;
    /// Upsert by id, returning the stored record.
    async fn save(&self, book: BookRecord) -> Result<BookRecord, RepoError>;
    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError>;
    /// Up to `limit` books, rating descending.
    async fn top_by_rating(&self, limit: usize) -> Result<Vec<BookRecord>, RepoError>;
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<AuthorRecord>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError>;
    async fn save(&self, author: AuthorRecord) -> Result<AuthorRecord, RepoError>;
    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError>;
    async fn top_by_rating(&self, limit: usize) -> Result<Vec<AuthorRecord>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<UserRecord>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;
    async fn save(&self, user: UserRecord) -> Result<UserRecord, RepoError>;
    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TokensRepo: Send + Sync {
    async fn insert(&self, token: TokenRecord) -> Result<(), RepoError>;
    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<TokenRecord>, RepoError>;
}
