//! Request and response bodies. Everything on the wire is camelCase; dates
//! travel as `YYYY-MM-DD`, timestamps as RFC 3339.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, BookRecord, Review, UserRecord};

use super::error::ApiError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_publication_date(raw: &str) -> Result<Date, ApiError> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|_| ApiError::invalid_input("publicationDate must be YYYY-MM-DD"))
}

fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

// ----------------------------------------------------------------------
// Shared
// ----------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub page_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRequest {
    pub book_id: Uuid,
    pub author_id: Uuid,
}

// ----------------------------------------------------------------------
// Users
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update; unknown fields are rejected so a typo never silently
/// drops a change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

// ----------------------------------------------------------------------
// Books
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateRequest {
    pub title: String,
    pub publication_date: String,
    pub description: String,
    pub genre: String,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateRequest {
    pub title: String,
    pub publication_date: String,
    pub description: String,
    pub genre: String,
    pub rating: f64,
}

/// Author fields embedded in a book response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub rating: f64,
    pub num_reviews: u32,
}

impl From<AuthorRecord> for AuthorSummary {
    fn from(author: AuthorRecord) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            rating: author.rating,
            num_reviews: author.num_reviews,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub publication_date: String,
    pub description: String,
    pub genre: String,
    pub rating: f64,
    pub authors: Vec<AuthorSummary>,
    pub reviews: Vec<Review>,
    pub num_reviews: u32,
    pub has_image: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl BookResponse {
    pub fn from_record(book: BookRecord, authors: Vec<AuthorRecord>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            publication_date: format_date(book.publication_date),
            description: book.description,
            genre: book.genre,
            rating: book.rating,
            authors: authors.into_iter().map(AuthorSummary::from).collect(),
            reviews: book.reviews,
            num_reviews: book.num_reviews,
            has_image: book.image.is_some(),
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

// ----------------------------------------------------------------------
// Authors
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AuthorCreateRequest {
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorUpdateRequest {
    pub name: String,
    pub bio: String,
}

/// Book fields embedded in an author response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub rating: f64,
}

impl From<BookRecord> for BookSummary {
    fn from(book: BookRecord) -> Self {
        Self {
            id: book.id,
            title: book.title,
            genre: book.genre,
            rating: book.rating,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub books: Vec<BookSummary>,
    pub reviews: Vec<Review>,
    pub rating: f64,
    pub num_reviews: u32,
    pub has_avatar: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl AuthorResponse {
    pub fn from_record(author: AuthorRecord, books: Vec<BookRecord>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            books: books.into_iter().map(BookSummary::from).collect(),
            reviews: author.reviews,
            rating: author.rating,
            num_reviews: author.num_reviews,
            has_avatar: author.avatar.is_some(),
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}
