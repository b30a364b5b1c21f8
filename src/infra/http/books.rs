//! Book route handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::info;
use uuid::Uuid;

use crate::application::books::{BookChanges, NewBook};
use crate::application::pagination::Page;
use crate::domain::entities::{BookRecord, Review};

use super::error::ApiError;
use super::extract::{AdminUser, CurrentUser};
use super::models::{
    BookCreateRequest, BookResponse, BookUpdateRequest, ListQuery, MessageResponse,
    RelationRequest, ReviewRequest, parse_publication_date,
};
use super::{AppState, uploads};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<BookResponse>>, ApiError> {
    let page = state
        .books
        .list(query.page_number.unwrap_or(1), query.keyword.as_deref())
        .await?;
    Ok(Json(respond_page(&state, page).await?))
}

pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let top = state.books.top().await?;
    let mut items = Vec::with_capacity(top.len());
    for book in top {
        items.push(respond(&state, book).await?);
    }
    Ok(Json(items))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.books.get(id).await?;
    Ok(Json(respond(&state, book).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<BookCreateRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let new = NewBook {
        title: body.title,
        publication_date: parse_publication_date(&body.publication_date)?,
        description: body.description,
        genre: body.genre,
        rating: body.rating,
    };
    let created = state.books.create(new).await?;
    info!(book_id = %created.id, title = %created.title, "book created");
    Ok((StatusCode::CREATED, Json(respond(&state, created).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BookUpdateRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let changes = BookChanges {
        title: body.title,
        publication_date: parse_publication_date(&body.publication_date)?,
        description: body.description,
        genre: body.genre,
        rating: body.rating,
    };
    let updated = state.books.update(id, changes).await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.books.delete(id).await?;
    info!(book_id = %id, "book removed");
    Ok(Json(MessageResponse {
        message: "Book removed",
    }))
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let review = Review {
        user_id: principal.user_id,
        reviewer_name: principal.name,
        rating: body.rating,
        comment: body.comment,
        created_at: time::OffsetDateTime::now_utc(),
    };
    state.books.add_review(id, review).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review added.",
        }),
    ))
}

pub async fn assign_author(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<RelationRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let updated = state.books.assign_author(body.book_id, body.author_id).await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn remove_author(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<RelationRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let updated = state.books.remove_author(body.book_id, body.author_id).await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn upload_image(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let raw = uploads::read_image_field(&mut multipart, "image", state.max_image_bytes).await?;
    let png = state.images.process(&raw)?;
    state.books.set_image(id, png).await?;
    Ok(Json(MessageResponse {
        message: "Image saved successfully.",
    }))
}

pub async fn delete_image(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.books.clear_image(id).await?;
    Ok(Json(MessageResponse {
        message: "Image removed.",
    }))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let png = state.books.image(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn respond(state: &AppState, book: BookRecord) -> Result<BookResponse, ApiError> {
    let authors = state.books.resolve_authors(&book).await?;
    Ok(BookResponse::from_record(book, authors))
}

async fn respond_page(
    state: &AppState,
    page: Page<BookRecord>,
) -> Result<Page<BookResponse>, ApiError> {
    let mut items = Vec::with_capacity(page.items.len());
    for book in page.items {
        items.push(respond(state, book).await?);
    }
    Ok(Page {
        items,
        page: page.page,
        pages: page.pages,
    })
}
