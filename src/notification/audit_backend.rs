//! Backend trait for the notification audit trail.
//!
//! Each dispatch writes a `pending` entry once content is rendered, then a
//! terminal entry (`sent`, `failed` or `preference_skipped`). Recording is
//! best-effort: a failing audit backend never changes a send outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::types::Metadata;

/// Errors that can occur during audit backend operations.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pending,
    Sent,
    Failed,
    PreferenceSkipped,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Sent => "sent",
            AuditStatus::Failed => "failed",
            AuditStatus::PreferenceSkipped => "preference_skipped",
        }
    }
}

/// One row of the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Shared by all entries of the same dispatch
    pub notification_id: Uuid,
    pub event_type: String,
    pub channel: String,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub status: AuditStatus,
    pub content: String,
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuditBackend: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError>;
}

/// Writes audit entries to the tracing output only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAuditBackend;

#[async_trait]
impl AuditBackend for LogAuditBackend {
    fn backend_type(&self) -> &'static str {
        "log"
    }

    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        tracing::info!(
            target: "notification_audit",
            notification_id = %entry.notification_id,
            event_type = %entry.event_type,
            channel = %entry.channel,
            recipient = %entry.recipient,
            status = entry.status.as_str(),
            error = entry.error.as_deref().unwrap_or(""),
            "Notification audit"
        );
        Ok(())
    }
}
