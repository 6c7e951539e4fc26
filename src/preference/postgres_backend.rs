//! PostgreSQL-based preference backend.
//!
//! Table structure:
//!
//! ```sql
//! CREATE TABLE notification_preferences (
//!     user_id          TEXT PRIMARY KEY,
//!     email_enabled    BOOLEAN NOT NULL DEFAULT TRUE,
//!     sms_enabled      BOOLEAN NOT NULL DEFAULT TRUE,
//!     whatsapp_enabled BOOLEAN NOT NULL DEFAULT TRUE,
//!     in_app_enabled   BOOLEAN NOT NULL DEFAULT TRUE,
//!     updated_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::backend::{PreferenceError, PreferenceLookup, PreferenceStore};
use super::types::{NotificationPreference, PreferenceUpdate};

type PreferenceRow = (String, bool, bool, bool, bool, DateTime<Utc>);

pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn from_row(row: PreferenceRow) -> NotificationPreference {
    let (user_id, email_enabled, sms_enabled, whatsapp_enabled, in_app_enabled, updated_at) = row;
    NotificationPreference {
        user_id,
        email_enabled,
        sms_enabled,
        whatsapp_enabled,
        in_app_enabled,
        updated_at,
    }
}

#[async_trait]
impl PreferenceLookup for PostgresPreferenceStore {
    async fn lookup(&self, user_id: &str) -> Result<Option<NotificationPreference>, PreferenceError> {
        let row: Option<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT user_id, email_enabled, sms_enabled, whatsapp_enabled, in_app_enabled, updated_at
            FROM notification_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn upsert(
        &self,
        user_id: &str,
        update: &PreferenceUpdate,
    ) -> Result<NotificationPreference, PreferenceError> {
        // NULL parameters keep the stored value (or the enabled default on insert)
        let row: PreferenceRow = sqlx::query_as(
            r#"
            INSERT INTO notification_preferences
                (user_id, email_enabled, sms_enabled, whatsapp_enabled, in_app_enabled, updated_at)
            VALUES ($1, COALESCE($2, TRUE), COALESCE($3, TRUE), COALESCE($4, TRUE), COALESCE($5, TRUE), NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                email_enabled    = COALESCE($2, notification_preferences.email_enabled),
                sms_enabled      = COALESCE($3, notification_preferences.sms_enabled),
                whatsapp_enabled = COALESCE($4, notification_preferences.whatsapp_enabled),
                in_app_enabled   = COALESCE($5, notification_preferences.in_app_enabled),
                updated_at       = NOW()
            RETURNING user_id, email_enabled, sms_enabled, whatsapp_enabled, in_app_enabled, updated_at
            "#,
        )
        .bind(user_id)
        .bind(update.email_enabled)
        .bind(update.sms_enabled)
        .bind(update.whatsapp_enabled)
        .bind(update.in_app_enabled)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, "Notification preferences upserted in PostgreSQL");

        Ok(from_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row() {
        let now = Utc::now();
        let pref = from_row(("user-9".to_string(), true, false, true, false, now));
        assert_eq!(pref.user_id, "user-9");
        assert!(!pref.allows("sms"));
        assert!(!pref.allows("in_app"));
        assert!(pref.allows("email"));
        assert_eq!(pref.updated_at, now);
    }
}
