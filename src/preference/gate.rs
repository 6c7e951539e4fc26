use std::sync::Arc;

use crate::metrics::PreferenceMetrics;

use super::backend::PreferenceLookup;

/// Decides whether a user accepts notifications on a channel.
///
/// Fail-open: a user without a stored record, or whose record cannot be
/// read, receives notifications on every channel.
#[derive(Clone)]
pub struct PreferenceGate {
    lookup: Arc<dyn PreferenceLookup>,
}

impl PreferenceGate {
    pub fn new(lookup: Arc<dyn PreferenceLookup>) -> Self {
        Self { lookup }
    }

    #[tracing::instrument(name = "preference.is_channel_enabled", skip(self))]
    pub async fn is_channel_enabled(&self, user_id: &str, channel: &str) -> bool {
        match self.lookup.lookup(user_id).await {
            Ok(Some(preference)) => {
                let enabled = preference.allows(channel);
                if enabled {
                    PreferenceMetrics::record_enabled();
                } else {
                    PreferenceMetrics::record_disabled();
                }
                enabled
            }
            Ok(None) => {
                PreferenceMetrics::record_missing();
                tracing::debug!(
                    user_id = %user_id,
                    "No notification preferences stored, using defaults"
                );
                true
            }
            Err(e) => {
                PreferenceMetrics::record_error();
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Preference lookup failed, allowing channel"
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::preference::{
        MemoryPreferenceStore, NotificationPreference, PreferenceError,
    };

    #[tokio::test]
    async fn test_missing_record_enables_every_channel() {
        let gate = PreferenceGate::new(Arc::new(MemoryPreferenceStore::new()));

        for channel in ["email", "sms", "whatsapp", "in_app"] {
            assert!(gate.is_channel_enabled("user-without-prefs", channel).await);
        }
    }

    #[tokio::test]
    async fn test_disabled_channel() {
        let store = MemoryPreferenceStore::new();
        let mut pref = NotificationPreference::all_enabled("user-with-sms-disabled");
        pref.sms_enabled = false;
        store.insert(pref);
        let gate = PreferenceGate::new(Arc::new(store));

        assert!(!gate.is_channel_enabled("user-with-sms-disabled", "sms").await);
        assert!(gate.is_channel_enabled("user-with-sms-disabled", "email").await);
    }

    struct FailingLookup;

    #[async_trait]
    impl PreferenceLookup for FailingLookup {
        async fn lookup(&self, _user_id: &str) -> Result<Option<NotificationPreference>, PreferenceError> {
            Err(PreferenceError::Unavailable("database down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_lookup_error_fails_open() {
        let gate = PreferenceGate::new(Arc::new(FailingLookup));
        assert!(gate.is_channel_enabled("user-1", "sms").await);
    }
}
