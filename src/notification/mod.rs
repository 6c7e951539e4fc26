//! Notification requests, dispatching, and the audit trail.
//!
//! # Audit Backend Architecture
//!
//! Every dispatch is recorded through an [`AuditBackend`]:
//!
//! - `LogAuditBackend`: tracing output only (default)
//! - `MemoryAuditBackend`: bounded in-memory buffer
//! - `PostgresAuditBackend`: rows in `notification_logs`
//!
//! Use `create_audit_backend()` to pick one from configuration.

mod audit_backend;
mod audit_factory;
mod audit_memory_backend;
mod audit_postgres_backend;
mod dispatcher;
mod transport;
mod types;

pub use audit_backend::{AuditBackend, AuditEntry, AuditError, AuditStatus, LogAuditBackend};
pub use audit_factory::create_audit_backend;
pub use audit_memory_backend::MemoryAuditBackend;
pub use audit_postgres_backend::PostgresAuditBackend;
pub use dispatcher::{DispatcherStats, DispatcherStatsSnapshot, NotificationDispatcher};
pub use transport::{DeliveryError, DeliveryTransport, FnTransport, LogTransport};
pub use types::{
    DeliveryContext, DeliveryStatus, Metadata, NotificationOutcome, NotificationRequest,
};
