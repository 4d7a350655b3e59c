//! Authentication route handlers.
//!
//! Signup, login, logout, and the session introspection endpoint. All
//! endpoints speak JSON; the session itself lives in a cookie managed by
//! tower-sessions.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use locsent_core::{PageId, Role, UserId, Username};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_session_user, set_session_user};
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User identity as returned to clients. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub page_id: PageId,
    pub username: Username,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            page_id: user.page_id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new account.
///
/// Does not log the new user in; the client follows up with a login call.
///
/// # Errors
///
/// Returns 403 when signup is disabled, 400 for an invalid username or weak
/// password, and 400 when the username is already taken.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = AuthService::new(state.notion(), &state.config().notion);
    let user = auth.signup(&body.username, &body.password).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "account created");

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// Verify credentials and establish a session.
///
/// # Errors
///
/// Returns 401 with a generic message on any credential failure so the
/// response does not reveal whether the username exists.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = AuthService::new(state.notion(), &state.config().notion);
    let user = auth.login(&body.username, &body.password).await?;

    set_session_user(&session, &user.to_session())
        .await
        .map_err(|e| {
            tracing::error!("failed to write session: {e}");
            AppError::Internal("session write failed".to_string())
        })?;
    set_sentry_user(user.id.as_str(), user.username.as_ref());

    tracing::info!(user_id = %user.id, username = %user.username, "login");

    Ok(Json(UserView::from(&user)))
}

/// Clear the session.
pub async fn logout(session: Session) -> StatusCode {
    if let Err(e) = clear_session_user(&session).await {
        tracing::error!("failed to clear session: {e}");
    }

    // Also destroy the entire session record, not just our key.
    if let Err(e) = session.flush().await {
        tracing::error!("failed to flush session: {e}");
    }
    clear_sentry_user();

    StatusCode::NO_CONTENT
}

/// Return the current session's user.
///
/// Re-validates against the users database so a deleted account stops
/// resolving even while its session cookie is still alive.
///
/// # Errors
///
/// Returns 401 when there is no session or the account no longer exists.
pub async fn me(
    RequireUser(current): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let Some(user) = state.users().find_by_page_id(&current.page_id).await? else {
        if let Err(e) = clear_session_user(&session).await {
            tracing::error!("failed to clear session: {e}");
        }
        return Err(AppError::Unauthorized(
            "Account no longer exists".to_string(),
        ));
    };

    Ok(Json(UserView::from(&user)))
}
