//! User route handlers: registration, login, profile, avatars, and the
//! admin user surface.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::info;
use uuid::Uuid;

use crate::application::users::{AdminUserChanges, NewUser, ProfileChanges};

use super::error::ApiError;
use super::extract::{AdminUser, CurrentUser};
use super::models::{
    AdminUserUpdateRequest, AuthResponse, LoginRequest, MessageResponse, ProfileUpdateRequest,
    RegisterRequest, UserResponse,
};
use super::{AppState, uploads};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (user, token) = state
        .users
        .register(NewUser {
            name: body.name,
            email: body.email,
            password: body.password,
            age: body.age,
        })
        .await?;
    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = state.users.login(&body.email, &body.password).await?;
    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.get(principal.user_id).await?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state
        .users
        .update_profile(
            principal.user_id,
            principal.is_admin,
            ProfileChanges {
                name: body.name,
                email: body.email,
                password: body.password,
                age: body.age,
                is_admin: body.is_admin,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

pub async fn list(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AdminUserUpdateRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let updated = state
        .users
        .update_user(
            id,
            AdminUserChanges {
                name: body.name,
                email: body.email,
                age: body.age,
                is_admin: body.is_admin,
            },
        )
        .await?;
    Ok((StatusCode::ACCEPTED, Json(updated.into())))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(id).await?;
    info!(user_id = %id, "user removed");
    Ok(Json(MessageResponse {
        message: "User removed",
    }))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let raw = uploads::read_image_field(&mut multipart, "avatar", state.max_image_bytes).await?;
    let png = state.images.process(&raw)?;
    state.users.set_avatar(principal.user_id, png).await?;
    Ok(Json(MessageResponse {
        message: "Avatar saved successfully.",
    }))
}

pub async fn delete_avatar(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.clear_avatar(principal.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Avatar removed.",
    }))
}

pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let png = state.users.avatar(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
