//! Wire-level error representation.
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}` with a
//! status chosen from the application error. Storage and telemetry failures
//! are logged server-side and collapse to an opaque 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::application::error::AppError;
use crate::application::images::ImageError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const INTERNAL: &str = "internal";
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: codes::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: codes::CONFLICT,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: codes::INVALID_INPUT,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: codes::UNAUTHORIZED,
            message: "please authenticate".to_string(),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: codes::FORBIDDEN,
            message: "admin access required".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: codes::INTERNAL,
            message: "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: &self.message,
            },
        });
        (self.status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(DomainError::NotFound { entity }) => {
                Self::not_found(format!("{entity} not found"))
            }
            AppError::Domain(DomainError::Conflict { message }) => Self::conflict(message),
            AppError::Domain(DomainError::Validation { message }) => Self::invalid_input(message),
            AppError::Domain(DomainError::Invariant { message }) => {
                error!(%message, "domain invariant violated");
                Self::internal()
            }
            AppError::Repo(RepoError::NotFound) => Self::not_found("record not found"),
            AppError::Repo(RepoError::Persistence(message)) => {
                error!(%message, "document store failure");
                Self::internal()
            }
            AppError::Infra(err) => {
                error!(error = %err, "infrastructure failure");
                Self::internal()
            }
            AppError::Unexpected(message) => {
                error!(%message, "unexpected failure");
                Self::internal()
            }
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Malformed => Self::invalid_input("please provide a valid image"),
            ImageError::Encoding(message) => {
                error!(%message, "image encoding failure");
                Self::internal()
            }
        }
    }
}
