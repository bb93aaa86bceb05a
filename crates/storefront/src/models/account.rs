//! Account domain types.
//!
//! The password hash is deliberately not part of [`Account`]; it only
//! surfaces through `AccountRepository::find_by_email` for verification.

use chrono::{DateTime, Utc};

use rummage_core::{AccountId, Email, Role};

/// A registered shopper or admin (domain type).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// The account's email address.
    pub email: Email,
    /// Display name shown in the UI.
    pub display_name: String,
    /// Privilege level.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
