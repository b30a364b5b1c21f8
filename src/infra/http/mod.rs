//! HTTP surface: router assembly and shared state.

mod authors;
mod books;
mod error;
mod extract;
mod models;
mod uploads;
mod users;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::application::auth::AuthService;
use crate::application::authors::AuthorService;
use crate::application::books::BookService;
use crate::application::images::ImageProcessor;
use crate::application::users::UserService;

pub use error::ApiError;
pub use extract::{AdminUser, CurrentUser};

#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
    pub authors: AuthorService,
    pub users: UserService,
    pub auth: AuthService,
    pub images: Arc<dyn ImageProcessor>,
    pub max_image_bytes: usize,
}

/// Build the catalog router. Authentication is enforced per handler through
/// the [`CurrentUser`]/[`AdminUser`] extractors.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Users
        .route("/api/users", post(users::register).get(users::list))
        .route("/api/users/login", post(users::login))
        .route(
            "/api/users/profile",
            get(users::profile).patch(users::update_profile),
        )
        .route(
            "/api/users/me/avatar",
            post(users::upload_avatar).delete(users::delete_avatar),
        )
        .route(
            "/api/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/users/{id}/avatar", get(users::get_avatar))
        // Books
        .route("/api/books", get(books::list).post(books::create))
        .route("/api/books/top", get(books::top))
        .route("/api/books/add-author", post(books::assign_author))
        .route("/api/books/remove-author", post(books::remove_author))
        .route(
            "/api/books/{id}",
            get(books::get).put(books::update).delete(books::delete),
        )
        .route("/api/books/{id}/reviews", post(books::create_review))
        .route(
            "/api/books/{id}/image",
            get(books::get_image)
                .post(books::upload_image)
                .delete(books::delete_image),
        )
        // Authors
        .route("/api/authors", get(authors::list).post(authors::create))
        .route("/api/authors/top", get(authors::top))
        .route("/api/authors/add-book", post(authors::assign_book))
        .route("/api/authors/remove-book", post(authors::remove_book))
        .route(
            "/api/authors/{id}",
            get(authors::get)
                .put(authors::update)
                .delete(authors::delete),
        )
        .route("/api/authors/{id}/reviews", post(authors::create_review))
        .route(
            "/api/authors/{id}/avatar",
            get(authors::get_avatar)
                .post(authors::upload_avatar)
                .delete(authors::delete_avatar),
        )
        .with_state(state)
}
