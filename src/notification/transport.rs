//! Delivery transport abstraction.
//!
//! Real transports (SMTP relays, SMS gateways, WhatsApp providers) live
//! outside this crate and plug in through [`DeliveryTransport`].

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

use super::types::DeliveryContext;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Provider-side failure, message passed through unchanged
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Deliver rendered content. Any error marks the notification as failed.
    async fn deliver(
        &self,
        recipient: &str,
        content: &str,
        context: &DeliveryContext,
    ) -> Result<(), DeliveryError>;
}

/// Log-only transport for dry runs and demos.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl DeliveryTransport for LogTransport {
    async fn deliver(
        &self,
        recipient: &str,
        content: &str,
        context: &DeliveryContext,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            notification_id = %context.notification_id,
            channel = %context.channel,
            event_type = %context.event_type,
            recipient = %recipient,
            content = %content,
            "Notification delivered (log only)"
        );
        Ok(())
    }
}

/// Adapts an async closure into a transport.
///
/// ```ignore
/// let transport = FnTransport::new(|recipient, content, ctx| async move {
///     smtp.send(&recipient, &content).await.map_err(|e| DeliveryError::Transport(e.to_string()))
/// });
/// ```
pub struct FnTransport<F> {
    deliver: F,
}

impl<F> FnTransport<F> {
    pub fn new(deliver: F) -> Self {
        Self { deliver }
    }
}

#[async_trait]
impl<F, Fut> DeliveryTransport for FnTransport<F>
where
    F: Fn(String, String, DeliveryContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), DeliveryError>> + Send,
{
    async fn deliver(
        &self,
        recipient: &str,
        content: &str,
        context: &DeliveryContext,
    ) -> Result<(), DeliveryError> {
        (self.deliver)(recipient.to_string(), content.to_string(), context.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn context() -> DeliveryContext {
        DeliveryContext {
            notification_id: Uuid::new_v4(),
            event_type: "mission_created".to_string(),
            channel: "sms".to_string(),
            metadata: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_log_transport_succeeds() {
        assert!(LogTransport.deliver("+221", "hello", &context()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fn_transport_receives_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let transport = FnTransport::new(move |recipient: String, content: String, ctx: DeliveryContext| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push((recipient, content, ctx.channel));
                Ok::<(), DeliveryError>(())
            }
        });

        transport.deliver("a@b.com", "Bonjour", &context()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("a@b.com".to_string(), "Bonjour".to_string(), "sms".to_string())]
        );
    }

    #[test]
    fn test_transport_error_message_is_verbatim() {
        assert_eq!(DeliveryError::Transport("SMTP down".to_string()).to_string(), "SMTP down");
    }
}
