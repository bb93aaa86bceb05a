//! Database operations for the storefront's SQLite database.
//!
//! # Tables
//!
//! - `account` - Registered shoppers and admins
//! - `product` - The sellable catalog
//! - `cart_line` - Per-account cart entries
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded via
//! [`MIGRATOR`]. They are run explicitly:
//!
//! ```bash
//! cargo run -p rummage-cli -- migrate
//! ```

pub mod accounts;
pub mod cart;
pub mod products;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if missing; WAL journaling keeps readers
/// from blocking the single writer.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
///
/// Any other error passes through as [`RepositoryError::Database`].
fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory database with the schema applied.
    ///
    /// A single connection keeps every handle on the same memory database.
    #[allow(clippy::expect_used)]
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        super::MIGRATOR.run(&pool).await.expect("migrations");
        pool
    }
}
