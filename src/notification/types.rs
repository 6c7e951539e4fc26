use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::{self, Variables};

/// Free-form data passed through to the transport and the audit log
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One notification to render and deliver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Event type, e.g. `mission_created` or `order/shipped`
    pub event_type: String,
    /// Channel-specific address (email, phone number, user id for in-app)
    pub recipient: String,
    /// Delivery channel (`email`, `sms`, `whatsapp`, ...)
    pub channel: String,
    /// Placeholder bindings
    #[serde(default)]
    pub variables: Variables,
    /// Explicit language; otherwise `variables["lang"]`, then the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    /// User whose channel preferences apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NotificationRequest {
    pub fn new(
        event_type: impl Into<String>,
        channel: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            recipient: recipient.into(),
            channel: channel.into(),
            variables: Variables::new(),
            language: None,
            metadata: Metadata::new(),
            user_id: None,
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Explicit language, else a non-empty `lang` variable, else `fallback`.
    pub fn effective_language<'a>(&'a self, fallback: &'a str) -> &'a str {
        template::effective_language(self.language.as_deref(), &self.variables, fallback)
    }
}

/// Terminal state of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    SendFailed,
    RenderFailed,
    /// The user turned the channel off; not a failure of the transport
    Skipped,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::SendFailed => "send_failed",
            DeliveryStatus::RenderFailed => "render_failed",
            DeliveryStatus::Skipped => "skipped",
        }
    }
}

/// What `send()` reports back. `error` is non-empty whenever `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: DeliveryStatus,
}

impl NotificationOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
            status: DeliveryStatus::Sent,
        }
    }

    pub fn send_failed(error: impl Into<String>) -> Self {
        Self::failure(DeliveryStatus::SendFailed, error.into())
    }

    pub fn render_failed(error: impl Into<String>) -> Self {
        Self::failure(DeliveryStatus::RenderFailed, error.into())
    }

    pub fn skipped(channel: &str) -> Self {
        Self::failure(
            DeliveryStatus::Skipped,
            format!("{} notifications are disabled for this user", channel),
        )
    }

    fn failure(status: DeliveryStatus, error: String) -> Self {
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };

        Self {
            success: false,
            error: Some(error),
            status,
        }
    }
}

/// Handed to the transport alongside recipient and content
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryContext {
    pub notification_id: Uuid,
    pub event_type: String,
    pub channel: String,
    pub metadata: Metadata,
}
