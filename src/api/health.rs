//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::notification::DispatcherStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: TemplateHealthResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub base_path: String,
    pub available: bool,
    pub fallback_language: String,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealthResponse {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub notifications: DispatcherStatsSnapshot,
    pub preference_backend: String,
    pub audit_backend: String,
}

/// GET /health
///
/// A missing template directory only degrades the service: every render
/// still succeeds through the built-in fallback.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let base_path = state.template_source.base_path();
    let templates_available = tokio::fs::metadata(base_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let postgres = match state.postgres_pool {
        Some(ref pool) => {
            let inner_pool = pool.pool();
            Some(PostgresHealthResponse {
                connected: pool.is_healthy().await,
                pool_size: inner_pool.size(),
                idle_connections: inner_pool.num_idle() as u32,
            })
        }
        None => None,
    };

    let postgres_ok = postgres.as_ref().map(|p| p.connected).unwrap_or(true);
    let status = if templates_available && postgres_ok {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        templates: TemplateHealthResponse {
            base_path: base_path.display().to_string(),
            available: templates_available,
            fallback_language: state.engine.fallback_language().to_string(),
        },
        postgres,
    })
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        notifications: state.dispatcher.stats(),
        preference_backend: state.preferences.store.backend_type().to_string(),
        audit_backend: state.dispatcher.audit_backend_type().to_string(),
    })
}
