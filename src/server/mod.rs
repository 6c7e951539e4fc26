//! HTTP server wiring: shared state and the axum router.

mod app;
mod state;

pub use app::create_app;
pub use state::AppState;
