//! Error types for the Bookdesk server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthenticated(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// Active loan already held by this user on this title
    #[error("User already borrowed this book")]
    AlreadyBorrowed,

    /// Copies exhausted, detected at transaction time
    #[error("Book is not available")]
    Unavailable,

    /// Borrow/return target does not exist
    #[error("Book not found")]
    UnknownBook,

    /// Return requested without an active loan
    #[error("No active borrow for this book")]
    NotBorrowed,

    /// Detail lookup miss
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable domain code rendered to clients regardless of HTTP mapping
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "AUTH_001",
            AppError::UsernameTaken => "AUTH_002",
            AppError::EmailTaken => "AUTH_003",
            AppError::AlreadyBorrowed => "LIB_001",
            AppError::Unavailable => "LIB_002",
            AppError::UnknownBook => "LIB_003",
            AppError::NotBorrowed => "LIB_004",
            AppError::NotFound(_) => "BOOK_404",
            AppError::InvalidPassword => "USER_001",
            AppError::PasswordRequired => "USER_003",
            AppError::Validation(_) => "VAL_001",
            AppError::Database(_) | AppError::Internal(_) => "SRV_001",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lending_errors_map_to_stable_codes() {
        assert_eq!(AppError::AlreadyBorrowed.code(), "LIB_001");
        assert_eq!(AppError::Unavailable.code(), "LIB_002");
        assert_eq!(AppError::UnknownBook.code(), "LIB_003");
        assert_eq!(AppError::NotBorrowed.code(), "LIB_004");
        assert_eq!(AppError::NotFound("book".into()).code(), "BOOK_404");
        assert_eq!(AppError::Unauthenticated("no token".into()).code(), "AUTH_001");
    }

    #[test]
    fn not_found_is_404_but_borrow_misses_are_400() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::UnknownBook.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
