use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::metrics::NotificationMetrics;
use crate::preference::PreferenceGate;
use crate::template::{EventPath, TemplateEngine};

use super::audit_backend::{AuditBackend, AuditEntry, AuditStatus, LogAuditBackend};
use super::transport::{DeliveryTransport, LogTransport};
use super::types::{DeliveryContext, DeliveryStatus, NotificationOutcome, NotificationRequest};

/// Statistics for the notification dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Every call to `send`
    pub total: AtomicU64,
    pub sent: AtomicU64,
    pub send_failed: AtomicU64,
    pub render_failed: AtomicU64,
    /// Suppressed by user preferences
    pub skipped: AtomicU64,
}

impl DispatcherStats {
    fn record(&self, status: DeliveryStatus) {
        let counter = match status {
            DeliveryStatus::Sent => &self.sent,
            DeliveryStatus::SendFailed => &self.send_failed,
            DeliveryStatus::RenderFailed => &self.render_failed,
            DeliveryStatus::Skipped => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            send_failed: self.send_failed.load(Ordering::Relaxed),
            render_failed: self.render_failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total: u64,
    pub sent: u64,
    pub send_failed: u64,
    pub render_failed: u64,
    pub skipped: u64,
}

/// Renders a request through the template engine and hands the result to a
/// delivery transport.
///
/// `send` never fails: every problem is reported in the returned
/// [`NotificationOutcome`].
pub struct NotificationDispatcher {
    engine: Arc<TemplateEngine>,
    gate: Option<PreferenceGate>,
    transport: Arc<dyn DeliveryTransport>,
    audit: Arc<dyn AuditBackend>,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    /// Create a dispatcher with the log-only transport and audit backend
    pub fn new(engine: Arc<TemplateEngine>) -> Self {
        Self {
            engine,
            gate: None,
            transport: Arc::new(LogTransport),
            audit: Arc::new(LogAuditBackend),
            stats: DispatcherStats::default(),
        }
    }

    /// Check user preferences for requests carrying a `user_id`
    pub fn with_preference_gate(mut self, gate: PreferenceGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn DeliveryTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditBackend>) -> Self {
        self.audit = audit;
        self
    }

    pub fn engine(&self) -> &Arc<TemplateEngine> {
        &self.engine
    }

    pub fn audit_backend_type(&self) -> &'static str {
        self.audit.backend_type()
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Render and deliver through the configured transport.
    pub async fn send(&self, request: NotificationRequest) -> NotificationOutcome {
        self.send_via(request, self.transport.as_ref()).await
    }

    /// Render and deliver through `transport` instead of the configured one.
    #[tracing::instrument(
        name = "dispatcher.send",
        skip(self, request, transport),
        fields(
            event_type = %request.event_type,
            channel = %request.channel,
            notification_id = tracing::field::Empty
        )
    )]
    pub async fn send_via(
        &self,
        request: NotificationRequest,
        transport: &dyn DeliveryTransport,
    ) -> NotificationOutcome {
        let notification_id = Uuid::new_v4();
        tracing::Span::current().record("notification_id", tracing::field::display(notification_id));
        self.stats.total.fetch_add(1, Ordering::Relaxed);

        let language = request
            .effective_language(self.engine.fallback_language())
            .to_string();

        let event_path = match EventPath::from_event_type(&request.event_type) {
            Ok(path) => path,
            Err(e) => {
                let error = e.to_string();
                self.audit(notification_id, &request, AuditStatus::Failed, "", Some(&error))
                    .await;
                return self.finish(&request, NotificationOutcome::render_failed(error));
            }
        };

        if let (Some(user_id), Some(gate)) = (request.user_id.as_deref(), &self.gate) {
            if !gate.is_channel_enabled(user_id, &request.channel).await {
                let outcome = NotificationOutcome::skipped(&request.channel);
                self.audit(
                    notification_id,
                    &request,
                    AuditStatus::PreferenceSkipped,
                    "",
                    outcome.error.as_deref(),
                )
                .await;
                return self.finish(&request, outcome);
            }
        }

        let rendered = match self
            .engine
            .render_detailed(&event_path, &request.channel, &language, &request.variables)
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => {
                let error = e.to_string();
                self.audit(notification_id, &request, AuditStatus::Failed, "", Some(&error))
                    .await;
                return self.finish(&request, NotificationOutcome::render_failed(error));
            }
        };

        self.audit(notification_id, &request, AuditStatus::Pending, &rendered.content, None)
            .await;

        let context = DeliveryContext {
            notification_id,
            event_type: request.event_type.clone(),
            channel: request.channel.clone(),
            metadata: request.metadata.clone(),
        };

        let started = Instant::now();
        let result = transport
            .deliver(&request.recipient, &rendered.content, &context)
            .await;
        NotificationMetrics::record_delivery_duration(&request.channel, started.elapsed());

        let outcome = match result {
            Ok(()) => {
                self.audit(notification_id, &request, AuditStatus::Sent, &rendered.content, None)
                    .await;
                NotificationOutcome::sent()
            }
            Err(e) => {
                let outcome = NotificationOutcome::send_failed(e.to_string());
                self.audit(
                    notification_id,
                    &request,
                    AuditStatus::Failed,
                    &rendered.content,
                    outcome.error.as_deref(),
                )
                .await;
                outcome
            }
        };

        self.finish(&request, outcome)
    }

    fn finish(&self, request: &NotificationRequest, outcome: NotificationOutcome) -> NotificationOutcome {
        self.stats.record(outcome.status);
        NotificationMetrics::record_outcome(&request.channel, outcome.status.as_str());

        if outcome.success {
            tracing::debug!(
                event_type = %request.event_type,
                channel = %request.channel,
                "Notification sent"
            );
        } else {
            tracing::warn!(
                event_type = %request.event_type,
                channel = %request.channel,
                status = outcome.status.as_str(),
                error = outcome.error.as_deref().unwrap_or_default(),
                "Notification not delivered"
            );
        }

        outcome
    }

    async fn audit(
        &self,
        notification_id: Uuid,
        request: &NotificationRequest,
        status: AuditStatus,
        content: &str,
        error: Option<&str>,
    ) {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            notification_id,
            event_type: request.event_type.clone(),
            channel: request.channel.clone(),
            recipient: request.recipient.clone(),
            user_id: request.user_id.clone(),
            status,
            content: content.to_string(),
            metadata: request.metadata.clone(),
            error: error.map(str::to_string),
            created_at: Utc::now(),
        };

        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(
                notification_id = %notification_id,
                status = status.as_str(),
                error = %e,
                "Failed to record notification audit entry"
            );
        }
    }
}
