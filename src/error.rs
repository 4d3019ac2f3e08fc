use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures inside the client itself. Remote API failures are
/// `api::ClientError` and are rendered inline on the page instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Refusing to persist an incomplete session")]
    IncompleteSession,

    #[error("Storage error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => return (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::IncompleteSession => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("{}", self);
        (status, "Something went wrong. Please try again.").into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
