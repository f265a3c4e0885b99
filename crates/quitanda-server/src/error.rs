use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::pages;
use crate::store::StoreError;

/// Failures that escape a handler. Everything here becomes a rendered 500
/// page; recoverable conditions (bad input, duplicate username, wrong
/// password) are flow outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, pages::error_page()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
