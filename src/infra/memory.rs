//! In-memory document store.
//!
//! One `MemoryStore` implements every repository trait over
//! `RwLock<HashMap>` collections. Saves are per-document upserts; that is
//! the only atomicity the services rely on. List reads return records in
//! creation order so pagination is stable.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::repos::{AuthorsRepo, BooksRepo, RepoError, TokensRepo, UsersRepo};
use crate::domain::entities::{AuthorRecord, BookRecord, TokenRecord, UserRecord};

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<HashMap<Uuid, BookRecord>>,
    authors: RwLock<HashMap<Uuid, AuthorRecord>>,
    users: RwLock<HashMap<Uuid, UserRecord>>,
    tokens: RwLock<HashMap<String, TokenRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_creation<T>(mut records: Vec<T>, key: impl Fn(&T) -> (time::OffsetDateTime, Uuid)) -> Vec<T> {
    records.sort_by_key(|r| key(r));
    records
}

#[async_trait]
impl BooksRepo for MemoryStore {
    async fn find_all(&self) -> Result<Vec<BookRecord>, RepoError> {
        let books = self.books.read().await;
        Ok(by_creation(books.values().cloned().collect(), |b| {
            (b.created_at, b.id)
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepoError> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn save(&self, book: BookRecord) -> Result<BookRecord, RepoError> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError> {
        self.books.write().await.remove(&id);
        Ok(())
    }

    async fn top_by_rating(&self, limit: usize) -> Result<Vec<BookRecord>, RepoError> {
        let mut books: Vec<BookRecord> = self.books.read().await.values().cloned().collect();
        books.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        books.truncate(limit);
        Ok(books)
    }
}

#[async_trait]
impl AuthorsRepo for MemoryStore {
    async fn find_all(&self) -> Result<Vec<AuthorRecord>, RepoError> {
        let authors = self.authors.read().await;
        Ok(by_creation(authors.values().cloned().collect(), |a| {
            (a.created_at, a.id)
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn save(&self, author: AuthorRecord) -> Result<AuthorRecord, RepoError> {
        self.authors.write().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError> {
        self.authors.write().await.remove(&id);
        Ok(())
    }

    async fn top_by_rating(&self, limit: usize) -> Result<Vec<AuthorRecord>, RepoError> {
        let mut authors: Vec<AuthorRecord> = self.authors.read().await.values().cloned().collect();
        authors.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        authors.truncate(limit);
        Ok(authors)
    }
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn find_all(&self) -> Result<Vec<UserRecord>, RepoError> {
        let users = self.users.read().await;
        Ok(by_creation(users.values().cloned().collect(), |u| {
            (u.created_at, u.id)
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn save(&self, user: UserRecord) -> Result<UserRecord, RepoError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError> {
        self.users.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TokensRepo for MemoryStore {
    async fn insert(&self, token: TokenRecord) -> Result<(), RepoError> {
        self.tokens
            .write()
            .await
            .insert(token.prefix.clone(), token);
        Ok(())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<TokenRecord>, RepoError> {
        Ok(self.tokens.read().await.get(prefix).cloned())
    }
}
