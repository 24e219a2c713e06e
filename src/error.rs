use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub const MAX_CATEGORY_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Category too long (max 50 chars)")]
    CategoryTooLong,
    #[error("No query")]
    NoQuery,
    #[error("Failed to save excuse: {0}")]
    SaveFailed(#[source] sqlx::Error),
    #[error("Search error: {0}")]
    SearchFailed(#[source] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::CategoryTooLong | AppError::NoQuery => StatusCode::BAD_REQUEST,
            AppError::SaveFailed(_) | AppError::SearchFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
