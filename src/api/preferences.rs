//! User notification preference endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::preference::{NotificationPreference, PreferenceUpdate};
use crate::server::AppState;

use super::notifications::ensure_known_channel;

#[derive(Debug, Serialize)]
pub struct ChannelPreferenceResponse {
    pub user_id: String,
    pub channel: String,
    pub enabled: bool,
}

/// GET /api/v1/preferences/{user_id}
#[tracing::instrument(name = "http.get_preferences", skip(state))]
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationPreference>> {
    state
        .preferences
        .store
        .lookup(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No preferences stored for user '{}'", user_id)))
}

/// PUT /api/v1/preferences/{user_id}
#[tracing::instrument(name = "http.update_preferences", skip(state, update))]
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<NotificationPreference>> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }

    let stored = state.preferences.store.upsert(&user_id, &update).await?;
    tracing::info!(user_id = %user_id, "Notification preferences updated");
    Ok(Json(stored))
}

/// GET /api/v1/preferences/{user_id}/channels/{channel}
#[tracing::instrument(name = "http.channel_enabled", skip(state))]
pub async fn channel_enabled(
    State(state): State<AppState>,
    Path((user_id, channel)): Path<(String, String)>,
) -> Result<Json<ChannelPreferenceResponse>> {
    ensure_known_channel(&state, &channel)?;
    let enabled = state.gate.is_channel_enabled(&user_id, &channel).await;

    Ok(Json(ChannelPreferenceResponse {
        user_id,
        channel,
        enabled,
    }))
}
