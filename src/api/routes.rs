use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::{health, stats};
use super::notifications::send_notification;
use super::preferences::{channel_enabled, get_preferences, update_preferences};
use super::templates::{render_template, scaffold, validate_all_templates};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .nest(
            "/api/v1",
            Router::new()
                // Dispatch
                .route("/notifications/send", post(send_notification))
                // Templates
                .route("/templates/render", post(render_template))
                .route("/templates/validation", get(validate_all_templates))
                .route("/templates/scaffold", post(scaffold))
                // Preferences
                .route(
                    "/preferences/{user_id}",
                    get(get_preferences).put(update_preferences),
                )
                .route(
                    "/preferences/{user_id}/channels/{channel}",
                    get(channel_enabled),
                ),
        )
}
