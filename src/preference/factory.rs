//! Preference backend factory

use std::sync::Arc;

use crate::config::PreferencesConfig;
use crate::postgres::PostgresPool;

use super::backend::{PreferenceLookup, PreferenceStore};
use super::memory_backend::MemoryPreferenceStore;
use super::postgres_backend::PostgresPreferenceStore;

/// The same backend seen through its read-only and read-write traits.
#[derive(Clone)]
pub struct PreferenceBackends {
    pub store: Arc<dyn PreferenceStore>,
    pub lookup: Arc<dyn PreferenceLookup>,
}

impl PreferenceBackends {
    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryPreferenceStore::new()))
    }

    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: PreferenceStore + 'static,
    {
        Self {
            store: backend.clone(),
            lookup: backend,
        }
    }
}

/// Create a preference backend based on configuration.
///
/// - `"postgres"`: `PostgresPreferenceStore` if a pool is provided
/// - `"memory"` (default): `MemoryPreferenceStore`
pub fn create_preference_backends(
    settings: &PreferencesConfig,
    postgres_pool: Option<&PostgresPool>,
) -> PreferenceBackends {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL preference backend");
                PreferenceBackends::from_backend(Arc::new(PostgresPreferenceStore::new(
                    pool.pool().clone(),
                )))
            } else {
                tracing::warn!(
                    "PostgreSQL preference backend requested but no pool provided, falling back to memory"
                );
                PreferenceBackends::memory()
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory preference backend");
            PreferenceBackends::memory()
        }
    }
}
