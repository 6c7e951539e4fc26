//! PostgreSQL-based audit backend.
//!
//! Appends one row per audit entry to `notification_logs`:
//!
//! ```sql
//! CREATE TABLE notification_logs (
//!     id UUID PRIMARY KEY,
//!     notification_id UUID NOT NULL,
//!     event_type TEXT NOT NULL,
//!     channel TEXT NOT NULL,
//!     recipient TEXT NOT NULL,
//!     user_id TEXT,
//!     status TEXT NOT NULL,
//!     content TEXT NOT NULL,
//!     metadata JSONB NOT NULL DEFAULT '{}',
//!     error TEXT,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::audit_backend::{AuditBackend, AuditEntry, AuditError};

pub struct PostgresAuditBackend {
    pool: PgPool,
}

impl PostgresAuditBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditBackend for PostgresAuditBackend {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let metadata = serde_json::Value::Object(entry.metadata.clone());

        sqlx::query(
            r#"
            INSERT INTO notification_logs
                (id, notification_id, event_type, channel, recipient, user_id,
                 status, content, metadata, error, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(entry.id)
        .bind(entry.notification_id)
        .bind(&entry.event_type)
        .bind(&entry.channel)
        .bind(&entry.recipient)
        .bind(entry.user_id.as_deref())
        .bind(entry.status.as_str())
        .bind(&entry.content)
        .bind(metadata)
        .bind(entry.error.as_deref())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(
            notification_id = %entry.notification_id,
            status = entry.status.as_str(),
            "Audit entry written to PostgreSQL"
        );

        Ok(())
    }
}
