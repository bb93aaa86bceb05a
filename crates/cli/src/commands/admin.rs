//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! rummage-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```
//!
//! Catalog management is role-gated, so every deployment needs at least one
//! account created (or promoted) through here.

use rummage_core::{Email, Role};
use rummage_storefront::db::accounts::AccountRepository;
use rummage_storefront::services::auth::{hash_password, validate_password};

use super::CommandError;

/// Create an admin account, or promote an existing account to admin.
///
/// If an account already exists for the email it is promoted in place and
/// the given password is ignored.
///
/// # Errors
///
/// Returns `CommandError` if the email or password fails validation or the
/// database is unreachable.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email: Email = email
        .parse()
        .map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let pool = super::connect().await?;
    let repo = AccountRepository::new(&pool);

    if let Some((existing, _)) = repo.find_by_email(&email).await? {
        if existing.role == Role::Admin {
            tracing::info!("Account {} is already an admin", email);
            return Ok(());
        }

        repo.set_role(existing.id, Role::Admin).await?;
        tracing::info!("Promoted existing account {} to admin", email);
        return Ok(());
    }

    validate_password(password)?;
    let hash = hash_password(password)?;

    let account = repo.create(&email, &hash, name, Role::Admin).await?;
    tracing::info!(
        "Admin account created! ID: {}, Email: {}",
        account.id,
        account.email
    );

    Ok(())
}
