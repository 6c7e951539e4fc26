//! User notification preferences.
//!
//! - `PreferenceLookup` / `PreferenceStore`: storage abstraction
//! - `MemoryPreferenceStore`, `PostgresPreferenceStore`: backends
//! - `PreferenceGate`: the fail-open channel check used before delivery

mod backend;
mod factory;
mod gate;
mod memory_backend;
mod postgres_backend;
mod types;

pub use backend::{PreferenceError, PreferenceLookup, PreferenceStore};
pub use factory::{create_preference_backends, PreferenceBackends};
pub use gate::PreferenceGate;
pub use memory_backend::MemoryPreferenceStore;
pub use postgres_backend::PostgresPreferenceStore;
pub use types::{NotificationPreference, PreferenceUpdate};
