use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::notification::{create_audit_backend, DeliveryTransport, LogTransport, NotificationDispatcher};
use crate::postgres::PostgresPool;
use crate::preference::{create_preference_backends, PreferenceBackends, PreferenceGate};
use crate::template::{FsTemplateSource, TemplateEngine};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub template_source: Arc<FsTemplateSource>,
    pub engine: Arc<TemplateEngine>,
    pub preferences: PreferenceBackends,
    pub gate: PreferenceGate,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub postgres_pool: Option<PostgresPool>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the state with the log-only delivery transport
    pub fn new(settings: Settings, postgres_pool: Option<PostgresPool>) -> Self {
        Self::with_transport(settings, postgres_pool, Arc::new(LogTransport))
    }

    pub fn with_transport(
        settings: Settings,
        postgres_pool: Option<PostgresPool>,
        transport: Arc<dyn DeliveryTransport>,
    ) -> Self {
        let template_source = Arc::new(FsTemplateSource::new(&settings.templates));
        let engine = Arc::new(TemplateEngine::new(template_source.clone(), &settings.templates));

        let preferences = create_preference_backends(&settings.preferences, postgres_pool.as_ref());
        let gate = PreferenceGate::new(preferences.lookup.clone());
        let audit = create_audit_backend(&settings.audit, postgres_pool.as_ref());

        let dispatcher = Arc::new(
            NotificationDispatcher::new(engine.clone())
                .with_preference_gate(gate.clone())
                .with_transport(transport)
                .with_audit(audit),
        );

        Self {
            settings: Arc::new(settings),
            template_source,
            engine,
            preferences,
            gate,
            dispatcher,
            postgres_pool,
            start_time: Instant::now(),
        }
    }
}
