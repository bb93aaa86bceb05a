//! Registration and login.
//!
//! Passwords are hashed with Argon2id. Login deliberately reports
//! "unknown email" and "wrong password" as distinct errors; the routes
//! surface them as distinct redirect codes.

pub mod error;

pub use error::AuthError;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::SqlitePool;

use rummage_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::Account;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration and login against the account table.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email fails validation,
    /// `AuthError::WeakPassword` if the password is too short, and
    /// `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let email: Email = email.parse()?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        let repo = AccountRepository::new(self.pool);

        match repo.create(&email, &hash, display_name, Role::Customer).await {
            Ok(account) => Ok(account),
            Err(RepositoryError::Conflict(_)) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownEmail` if no account has that email and
    /// `AuthError::WrongPassword` if the password doesn't match.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email: Email = email.parse().map_err(|_| AuthError::UnknownEmail)?;
        let repo = AccountRepository::new(self.pool);

        let (account, stored_hash) = repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        verify_password(password, &stored_hash)?;
        Ok(account)
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::WrongPassword` on mismatch and
/// `AuthError::PasswordHash` if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::WrongPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("hunter2").is_err());
        assert!(validate_password("hunter22").is_ok());
    }

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::WrongPassword)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        let account = auth
            .register("amy@example.com", "Amy", "a long password")
            .await
            .unwrap();
        assert_eq!(account.role, Role::Customer);

        let logged_in = auth.login("amy@example.com", "a long password").await.unwrap();
        assert_eq!(logged_in.id, account.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("amy@example.com", "Amy", "a long password")
            .await
            .unwrap();
        let err = auth
            .register("amy@example.com", "Amy Again", "another password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        let err = auth.register("amy@example.com", "Amy", "short").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword));
    }

    #[tokio::test]
    async fn test_login_errors_are_distinct() {
        let pool = memory_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("amy@example.com", "Amy", "a long password")
            .await
            .unwrap();

        assert!(matches!(
            auth.login("nobody@example.com", "a long password").await.unwrap_err(),
            AuthError::UnknownEmail
        ));
        assert!(matches!(
            auth.login("amy@example.com", "not the password").await.unwrap_err(),
            AuthError::WrongPassword
        ));
    }
}
