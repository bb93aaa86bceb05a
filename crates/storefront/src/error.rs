//! Unified error handling for route handlers.
//!
//! Route handlers return `Result<T, AppError>`; the `IntoResponse` impl maps
//! each error to a status code and a client-safe message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::orders::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Order settlement failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller lacks the required role.
    #[error("forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Order(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request error");
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Order(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::UnknownEmail | AuthError::WrongPassword => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::UnknownProduct => StatusCode::NOT_FOUND,
                CartError::Pricing(_) | CartError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Internal details stay out of the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_owned()
        } else {
            match &self {
                Self::Auth(AuthError::UnknownEmail) => {
                    "That email does not exist, please try again".to_owned()
                }
                Self::Auth(AuthError::WrongPassword) => {
                    "Password incorrect, please try again".to_owned()
                }
                Self::Auth(AuthError::EmailTaken) => {
                    "An account with this email already exists".to_owned()
                }
                Self::Forbidden => String::new(),
                _ => self.to_string(),
            }
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
