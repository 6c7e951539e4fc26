//! Backend traits for notification preference storage.
//!
//! The dispatch path only needs [`PreferenceLookup`]. [`PreferenceStore`]
//! adds the write side used by the preference API.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{NotificationPreference, PreferenceUpdate};

/// Errors that can occur during preference backend operations.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Read access to user preferences.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across concurrent sends.
#[async_trait]
pub trait PreferenceLookup: Send + Sync {
    /// Fetch the stored record; `Ok(None)` when the user never set one.
    async fn lookup(&self, user_id: &str) -> Result<Option<NotificationPreference>, PreferenceError>;
}

/// Preference storage with write access.
#[async_trait]
pub trait PreferenceStore: PreferenceLookup {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Create or update a user's record and return the stored result.
    async fn upsert(
        &self,
        user_id: &str,
        update: &PreferenceUpdate,
    ) -> Result<NotificationPreference, PreferenceError>;
}
