use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::user::User;
use crate::session::auth::{self, AuthForm};
use crate::state::AppState;

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(form): Json<AuthForm>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = auth::signup(&state.session, &state.toasts, &form)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(form): Json<AuthForm>,
) -> Result<Json<User>, AppError> {
    Ok(Json(auth::login(&state.session, &state.toasts, &form)?))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    auth::logout(&state.session)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/session
/// The signed-in user, or `null`.
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<Option<User>>, AppError> {
    Ok(Json(state.session.current_user()?))
}
