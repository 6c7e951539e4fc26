//! PostgreSQL persistence module.
//!
//! Provides the connection pool shared by the PostgreSQL preference and
//! audit backends.

pub mod pool;

pub use pool::{PostgresPool, PostgresPoolError};
