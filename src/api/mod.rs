//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod metrics;
mod notifications;
mod preferences;
mod routes;
mod templates;

// Re-export all handlers for use in server/app.rs
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use notifications::send_notification;
pub use preferences::{channel_enabled, get_preferences, update_preferences};
pub use routes::api_routes;
pub use templates::{render_template, scaffold, validate_all_templates};
