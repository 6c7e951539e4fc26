//! Audit backend factory

use std::sync::Arc;

use crate::config::AuditConfig;
use crate::postgres::PostgresPool;

use super::audit_backend::{AuditBackend, LogAuditBackend};
use super::audit_memory_backend::MemoryAuditBackend;
use super::audit_postgres_backend::PostgresAuditBackend;

/// Create an audit backend based on configuration.
///
/// - `"postgres"`: `PostgresAuditBackend` if a pool is provided, else log
/// - `"memory"`: `MemoryAuditBackend`
/// - `"log"` (default): `LogAuditBackend`
pub fn create_audit_backend(
    settings: &AuditConfig,
    postgres_pool: Option<&PostgresPool>,
) -> Arc<dyn AuditBackend> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL audit backend");
                Arc::new(PostgresAuditBackend::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL audit backend requested but no pool provided, falling back to log"
                );
                Arc::new(LogAuditBackend)
            }
        }
        "memory" => {
            tracing::info!(backend = "memory", "Creating memory audit backend");
            Arc::new(MemoryAuditBackend::new())
        }
        _ => {
            tracing::info!(backend = "log", "Creating log audit backend");
            Arc::new(LogAuditBackend)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str) -> AuditConfig {
        AuditConfig {
            backend: backend.to_string(),
        }
    }

    #[test]
    fn test_backend_selection() {
        assert_eq!(create_audit_backend(&config("memory"), None).backend_type(), "memory");
        assert_eq!(create_audit_backend(&config("log"), None).backend_type(), "log");
        assert_eq!(create_audit_backend(&config("unknown"), None).backend_type(), "log");
    }

    #[test]
    fn test_postgres_without_pool_falls_back_to_log() {
        assert_eq!(create_audit_backend(&config("postgres"), None).backend_type(), "log");
    }
}
