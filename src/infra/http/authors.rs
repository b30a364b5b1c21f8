//! Author route handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::info;
use uuid::Uuid;

use crate::application::authors::{AuthorChanges, NewAuthor};
use crate::application::pagination::Page;
use crate::domain::entities::{AuthorRecord, Review};

use super::error::ApiError;
use super::extract::{AdminUser, CurrentUser};
use super::models::{
    AuthorCreateRequest, AuthorResponse, AuthorUpdateRequest, ListQuery, MessageResponse,
    RelationRequest, ReviewRequest,
};
use super::{AppState, uploads};

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<AuthorResponse>>, ApiError> {
    let page = state
        .authors
        .list(query.page_number.unwrap_or(1), query.keyword.as_deref())
        .await?;
    let mut items = Vec::with_capacity(page.items.len());
    for author in page.items {
        items.push(respond(&state, author).await?);
    }
    Ok(Json(Page {
        items,
        page: page.page,
        pages: page.pages,
    }))
}

pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<AuthorResponse>>, ApiError> {
    let top = state.authors.top().await?;
    let mut items = Vec::with_capacity(top.len());
    for author in top {
        items.push(respond(&state, author).await?);
    }
    Ok(Json(items))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let author = state.authors.get(id).await?;
    Ok(Json(respond(&state, author).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<AuthorCreateRequest>,
) -> Result<(StatusCode, Json<AuthorResponse>), ApiError> {
    let created = state
        .authors
        .create(NewAuthor {
            name: body.name,
            bio: body.bio,
        })
        .await?;
    info!(author_id = %created.id, name = %created.name, "author created");
    Ok((StatusCode::CREATED, Json(respond(&state, created).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AuthorUpdateRequest>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let updated = state
        .authors
        .update(
            id,
            AuthorChanges {
                name: body.name,
                bio: body.bio,
            },
        )
        .await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.authors.delete(id).await?;
    info!(author_id = %id, "author removed");
    Ok(Json(MessageResponse {
        message: "Author removed",
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
    state.authors.add_review(id, review).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review added.",
        }),
    ))
}

pub async fn assign_book(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<RelationRequest>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let updated = state.authors.assign_book(body.author_id, body.book_id).await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn remove_book(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<RelationRequest>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let updated = state.authors.remove_book(body.author_id, body.book_id).await?;
    Ok(Json(respond(&state, updated).await?))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let raw = uploads::read_image_field(&mut multipart, "avatar", state.max_image_bytes).await?;
    let png = state.images.process(&raw)?;
    state.authors.set_avatar(id, png).await?;
    Ok(Json(MessageResponse {
        message: "Avatar saved successfully.",
    }))
}

pub async fn delete_avatar(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.authors.clear_avatar(id).await?;
    Ok(Json(MessageResponse {
        message: "Avatar removed.",
    }))
}

pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let png = state.authors.avatar(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn respond(state: &AppState, author: AuthorRecord) -> Result<AuthorResponse, ApiError> {
    let books = state.authors.resolve_books(&author).await?;
    Ok(AuthorResponse::from_record(author, books))
}
