//! Account repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use rummage_core::{AccountId, Email, Role};

use super::{RepositoryError, map_unique_violation};
use crate::models::Account;

/// An account row joined with its password hash.
///
/// Private to the db layer so the hash never travels further than the
/// verification call site.
#[derive(Debug, sqlx::FromRow)]
struct AccountWithHash {
    id: AccountId,
    email: Email,
    password_hash: String,
    display_name: String,
    role: Role,
    created_at: DateTime<Utc>,
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        display_name: &str,
        role: Role,
    ) -> Result<Account, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO account (email, password_hash, display_name, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, email, display_name, role, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email already registered"))?;

        Ok(account)
    }

    /// Look up an account by email, returning it with the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithHash>(
            "SELECT id, email, password_hash, display_name, role, created_at
             FROM account WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                Account {
                    id: r.id,
                    email: r.email,
                    display_name: r.display_name,
                    role: r.role,
                    created_at: r.created_at,
                },
                r.password_hash,
            )
        }))
    }

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, id: AccountId, role: Role) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE account SET role = ? WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
