//! Authentication route handlers.
//!
//! Login and registration talk back to the browser through redirects: a
//! failure redirects to the form with an `error` code, success redirects
//! home with the session established.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::MessageQuery;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

/// Form-state payload echoed by the GET endpoints.
#[derive(Debug, Serialize)]
pub struct FormState {
    pub error: Option<String>,
}

/// Display the login form state.
pub async fn login_page(Query(query): Query<MessageQuery>) -> Json<FormState> {
    Json(FormState { error: query.error })
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let (Some(email), Some(password)) = (form.email, form.password) else {
        return Ok(Redirect::to("/login?error=missing_fields").into_response());
    };

    match AuthService::new(state.pool()).login(&email, &password).await {
        Ok(account) => {
            let user = CurrentUser {
                id: account.id,
                email: account.email,
                role: account.role,
            };
            set_current_user(&session, &user)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::UnknownEmail) => {
            tracing::debug!(%email, "login with unknown email");
            Ok(Redirect::to("/login?error=unknown_email").into_response())
        }
        Err(AuthError::WrongPassword) => {
            tracing::debug!(%email, "login with wrong password");
            Ok(Redirect::to("/login?error=bad_password").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the registration form state.
pub async fn register_page(Query(query): Query<MessageQuery>) -> Json<FormState> {
    Json(FormState { error: query.error })
}

/// Handle registration form submission.
///
/// A duplicate email redirects to the login form, since the shopper
/// already has an account there.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let (Some(email), Some(display_name), Some(password)) =
        (form.email, form.display_name, form.password)
    else {
        return Ok(Redirect::to("/register?error=missing_fields").into_response());
    };
    if email.is_empty() || display_name.is_empty() || password.is_empty() {
        return Ok(Redirect::to("/register?error=missing_fields").into_response());
    }

    match AuthService::new(state.pool())
        .register(&email, &display_name, &password)
        .await
    {
        Ok(account) => {
            let user = CurrentUser {
                id: account.id,
                email: account.email,
                role: account.role,
            };
            set_current_user(&session, &user)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::EmailTaken) => {
            Ok(Redirect::to("/login?error=email_taken").into_response())
        }
        Err(AuthError::WeakPassword) => {
            Ok(Redirect::to("/register?error=password_too_short").into_response())
        }
        Err(AuthError::InvalidEmail(_)) => {
            Ok(Redirect::to("/register?error=invalid_email").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// End the session and go home.
///
/// Requires a login: anonymous visitors bounce to the login page like any
/// other authenticated route.
pub async fn logout(RequireAuth(_user): RequireAuth, session: Session) -> Result<Redirect> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Redirect::to("/"))
}
