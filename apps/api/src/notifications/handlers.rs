use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::toast::Toast;
use crate::state::AppState;

/// GET /api/v1/notifications
pub async fn handle_list_notifications(State(state): State<AppState>) -> Json<Vec<Toast>> {
    Json(state.toasts.active())
}

/// DELETE /api/v1/notifications/:id
pub async fn handle_dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.toasts.dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Notification {id} not found")))
    }
}
