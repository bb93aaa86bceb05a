//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use rummage_core::{AccountId, Email, Role};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's email address.
    pub email: Email,
    /// Privilege level at login time.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in account.
    pub const CURRENT_USER: &str = "current_user";
}
