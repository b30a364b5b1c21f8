//! Catalog entities mirrored from the document store.

use bytes::Bytes;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// A single review left by a user on a book or an author.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: Uuid,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub publication_date: Date,
    pub description: String,
    pub genre: String,
    /// Arithmetic mean of review ratings; kept in sync by the review path.
    pub rating: f64,
    pub author_ids: Vec<Uuid>,
    pub image: Option<Bytes>,
    pub reviews: Vec<Review>,
    pub num_reviews: u32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub avatar: Option<Bytes>,
    pub book_ids: Vec<Uuid>,
    pub reviews: Vec<Review>,
    pub rating: f64,
    pub num_reviews: u32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// Stored trimmed and lowercased; unique across users.
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub age: u32,
    pub is_admin: bool,
    pub avatar: Option<Bytes>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// An issued bearer token, secret stored hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub created_at: OffsetDateTime,
}
