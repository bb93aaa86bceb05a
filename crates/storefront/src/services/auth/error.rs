//! Authentication error types.

use thiserror::Error;

use rummage_core::EmailError;

use crate::db::RepositoryError;
use crate::services::auth::MIN_PASSWORD_LENGTH;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account exists for the given email.
    #[error("no account with that email")]
    UnknownEmail,

    /// The password did not match the stored hash.
    #[error("password incorrect")]
    WrongPassword,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Hashing or parsing a password hash failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
