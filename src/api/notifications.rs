//! Notification send endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::notification::{Metadata, NotificationOutcome, NotificationRequest};
use crate::server::AppState;
use crate::template::variables_from_json;

/// Request to render and deliver one notification
#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    /// Event type (e.g., "mission_created" or "mission/created")
    pub event_type: String,
    /// Channel-specific address
    pub recipient: String,
    /// Delivery channel, one of the configured channels
    pub channel: String,
    /// Placeholder values; non-string JSON values are converted to text
    #[serde(default)]
    pub variables: serde_json::Value,
    pub language: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Apply this user's channel preferences
    pub user_id: Option<String>,
}

/// POST /api/v1/notifications/send
///
/// Delivery problems are reported in the body with `success: false`; only
/// malformed requests produce an HTTP error.
#[tracing::instrument(
    name = "http.send_notification",
    skip(state, request),
    fields(event_type = %request.event_type, channel = %request.channel)
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendNotificationRequest>,
) -> Result<Json<NotificationOutcome>> {
    if request.event_type.trim().is_empty() {
        return Err(AppError::Validation("event_type is required".to_string()));
    }
    if request.recipient.trim().is_empty() {
        return Err(AppError::Validation("recipient is required".to_string()));
    }
    ensure_known_channel(&state, &request.channel)?;

    let mut notification =
        NotificationRequest::new(request.event_type, request.channel, request.recipient)
            .variables(variables_from_json(&request.variables))
            .metadata(request.metadata);
    if let Some(language) = request.language {
        notification = notification.language(language);
    }
    if let Some(user_id) = request.user_id {
        notification = notification.user_id(user_id);
    }

    Ok(Json(state.dispatcher.send(notification).await))
}

pub(crate) fn ensure_known_channel(state: &AppState, channel: &str) -> Result<()> {
    if state.settings.templates.is_known_channel(channel) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unknown channel '{}', expected one of: {}",
            channel,
            state.settings.templates.channels.join(", ")
        )))
    }
}
