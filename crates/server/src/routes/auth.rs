//! Session authentication route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::models::user::UserProfile;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration payload.
///
/// Missing fields default to empty strings so the service reports them
/// with the field-level validation messages instead of a body-parse 422.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/register` - create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool())
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// `POST /api/auth/login` - authenticate and start a session.
///
/// Replaces any principal already attached to the session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<UserProfile>> {
    let user = AuthService::new(state.pool())
        .login(&payload.email, &payload.password)
        .await?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(UserProfile::from(&user)))
}

/// `POST /api/auth/logout` - end the session.
///
/// Idempotent: logging out without a session still succeeds.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session).await?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// `GET /api/auth/me` - return the current principal's profile, or JSON
/// `null` when anonymous.
///
/// The principal is re-resolved against the user store so a deleted
/// account can't keep acting through a stale session; such sessions are
/// cleared on sight.
pub async fn me(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(principal): OptionalAuth,
) -> Result<Json<Value>> {
    let Some(principal) = principal else {
        return Ok(Json(Value::Null));
    };

    match AuthService::new(state.pool()).get_user(principal.id).await? {
        Some(user) => Ok(Json(json!(UserProfile::from(&user)))),
        None => {
            clear_current_user(&session).await?;
            Ok(Json(Value::Null))
        }
    }
}
