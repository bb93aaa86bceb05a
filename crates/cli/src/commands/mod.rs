//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository error.
    #[error(transparent)]
    Repository(#[from] rummage_storefront::db::RepositoryError),

    /// Auth error (password hashing, validation).
    #[error(transparent)]
    Auth(#[from] rummage_storefront::services::auth::AuthError),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Seed data failed validation.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Connect to the storefront database named by the environment.
///
/// Reads `STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = rummage_storefront::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
