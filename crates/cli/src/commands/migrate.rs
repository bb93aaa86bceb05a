//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rummage-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`)

use super::CommandError;

/// Run the storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    rummage_storefront::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
