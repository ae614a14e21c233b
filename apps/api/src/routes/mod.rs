pub mod health;
pub mod plans;
pub mod text;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::humanize::handlers as humanize;
use crate::humanize::upload::MAX_UPLOAD_BYTES;
use crate::notifications::handlers as notifications;
use crate::session::handlers as session;
use crate::state::AppState;

/// Oversized files must reach upload validation instead of being cut off by
/// the default body limit, so multipart overhead gets headroom.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES * 2;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/auth/signup", post(session::handle_signup))
        .route("/api/v1/auth/login", post(session::handle_login))
        .route("/api/v1/auth/logout", post(session::handle_logout))
        .route("/api/v1/session", get(session::handle_get_session))
        // Humanize
        .route("/api/v1/humanize", post(humanize::handle_humanize))
        .route("/api/v1/jobs", get(humanize::handle_list_jobs))
        .route("/api/v1/jobs/:id", delete(humanize::handle_delete_job))
        .route("/api/v1/jobs/:id/rerun", post(humanize::handle_rerun_job))
        .route("/api/v1/dashboard", get(humanize::handle_dashboard))
        .route(
            "/api/v1/files",
            post(humanize::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/settings/api-key",
            get(humanize::handle_get_api_key)
                .put(humanize::handle_put_api_key)
                .delete(humanize::handle_delete_api_key),
        )
        // Notifications
        .route(
            "/api/v1/notifications",
            get(notifications::handle_list_notifications),
        )
        .route(
            "/api/v1/notifications/:id",
            delete(notifications::handle_dismiss_notification),
        )
        // Plans and editor helpers
        .route("/api/v1/plans", get(plans::handle_list_plans))
        .route("/api/v1/plans/:tier/select", post(plans::handle_select_plan))
        .route("/api/v1/text/analyze", post(text::handle_analyze))
        .route("/api/v1/password/check", post(text::handle_password_check))
        .with_state(state)
}
