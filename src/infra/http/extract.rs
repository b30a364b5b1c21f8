//! Request extractors for authenticated and admin callers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::application::auth::Principal;

use super::error::ApiError;
use super::AppState;

/// Extracts the caller behind a `Bearer` token; rejects with 401 when the
/// token is missing or does not resolve.
pub struct CurrentUser(pub Principal);

/// [`CurrentUser`] narrowed to admins; non-admins are rejected with 403.
pub struct AdminUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;
        let principal = state.auth.authenticate(token).await.map_err(|err| {
            debug!(error = %err, "token rejected");
            ApiError::unauthorized()
        })?;
        Ok(Self(principal))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;
        if !principal.is_admin {
            return Err(ApiError::forbidden());
        }
        Ok(Self(principal))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
