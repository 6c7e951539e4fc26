//! In-memory preference backend using DashMap.
//!
//! Records are lost on restart.

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{PreferenceError, PreferenceLookup, PreferenceStore};
use super::types::{NotificationPreference, PreferenceUpdate};

#[derive(Default)]
pub struct MemoryPreferenceStore {
    records: DashMap<String, NotificationPreference>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's record wholesale
    pub fn insert(&self, preference: NotificationPreference) {
        self.records.insert(preference.user_id.clone(), preference);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PreferenceLookup for MemoryPreferenceStore {
    async fn lookup(&self, user_id: &str) -> Result<Option<NotificationPreference>, PreferenceError> {
        Ok(self.records.get(user_id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn upsert(
        &self,
        user_id: &str,
        update: &PreferenceUpdate,
    ) -> Result<NotificationPreference, PreferenceError> {
        let mut entry = self
            .records
            .entry(user_id.to_string())
            .or_insert_with(|| NotificationPreference::all_enabled(user_id));
        entry.apply(update);

        tracing::debug!(user_id = %user_id, "Notification preferences updated");

        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_missing() {
        let store = MemoryPreferenceStore::new();
        assert!(store.lookup("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_merges() {
        let store = MemoryPreferenceStore::new();

        let created = store
            .upsert(
                "user-1",
                &PreferenceUpdate {
                    sms_enabled: Some(false),
                    ..PreferenceUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(!created.sms_enabled);
        assert!(created.email_enabled);

        let updated = store
            .upsert(
                "user-1",
                &PreferenceUpdate {
                    email_enabled: Some(false),
                    ..PreferenceUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.sms_enabled);
        assert!(!updated.email_enabled);
        assert_eq!(store.len(), 1);

        let stored = store.lookup("user-1").await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }
}
