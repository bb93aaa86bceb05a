//! Authentication extractors.
//!
//! Handlers take [`RequireAuth`], [`RequireAdmin`], or [`OptionalAuth`]
//! instead of reading the session themselves.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in account.
///
/// Rejects with a redirect to the login page, matching how the rest of the
/// site communicates through redirects.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in admin.
///
/// Non-admins get a bare `403 Forbidden`, logged-out visitors the login
/// redirect.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// Not logged in.
    RedirectToLogin,
    /// Logged in, but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

async fn current_user_from_parts(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;
        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user_from_parts(parts)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;
        if !user.role.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current account.
///
/// Never rejects; anonymous visitors yield `None`.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user_from_parts(parts).await))
    }
}

/// Store the current account in the session after login or registration.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the current account from the session (logout).
///
/// Flushes the session afterwards so the server-side record is destroyed,
/// not just emptied.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(session_keys::CURRENT_USER).await?;
    session.flush().await
}
