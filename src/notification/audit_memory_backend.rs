//! In-memory audit backend.
//!
//! Keeps the most recent entries in a bounded ring buffer. Entries are lost
//! on restart.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::audit_backend::{AuditBackend, AuditEntry, AuditError};

const DEFAULT_CAPACITY: usize = 10_000;

pub struct MemoryAuditBackend {
    entries: Mutex<VecDeque<AuditEntry>>,
    capacity: usize,
}

impl Default for MemoryAuditBackend {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MemoryAuditBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Entries belonging to one dispatch, oldest first
    pub fn entries_for(&self, notification_id: Uuid) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .filter(|e| e.notification_id == notification_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<AuditEntry>> {
        // A poisoned buffer still holds valid entries
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AuditBackend for MemoryAuditBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
        Ok(())
    }
}
