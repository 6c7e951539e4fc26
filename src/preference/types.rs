use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user channel opt-ins, owned by the preference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    pub user_id: String,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub whatsapp_enabled: bool,
    pub in_app_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl NotificationPreference {
    /// Record with every channel enabled
    pub fn all_enabled(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email_enabled: true,
            sms_enabled: true,
            whatsapp_enabled: true,
            in_app_enabled: true,
            updated_at: Utc::now(),
        }
    }

    /// Whether this record lets `channel` through.
    ///
    /// Channels without a dedicated flag are allowed.
    pub fn allows(&self, channel: &str) -> bool {
        match channel {
            "email" => self.email_enabled,
            "sms" => self.sms_enabled,
            "whatsapp" => self.whatsapp_enabled,
            "in_app" => self.in_app_enabled,
            _ => true,
        }
    }

    /// Apply an update; absent fields keep their current value.
    pub fn apply(&mut self, update: &PreferenceUpdate) {
        if let Some(enabled) = update.email_enabled {
            self.email_enabled = enabled;
        }
        if let Some(enabled) = update.sms_enabled {
            self.sms_enabled = enabled;
        }
        if let Some(enabled) = update.whatsapp_enabled {
            self.whatsapp_enabled = enabled;
        }
        if let Some(enabled) = update.in_app_enabled {
            self.in_app_enabled = enabled;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial preference change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceUpdate {
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
}
