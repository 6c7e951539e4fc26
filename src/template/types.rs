//! Template keys, bindings and errors

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event-path namespace holding channel/language generic templates
pub const DEFAULT_BUCKET: &str = "default";

/// File name of the catch-all template inside the default bucket
pub const CATCH_ALL_FILE: &str = "global.txt";

/// Used when not even the catch-all template exists
pub const BUILTIN_FALLBACK: &str = "Notification: {{content}}";

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid event path: {0}")]
    InvalidEventPath(String),

    #[error("Invalid template key: {0}")]
    InvalidKey(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Placeholder identifier to display value.
pub type Variables = BTreeMap<String, String>;

/// Convert a JSON object into string bindings.
///
/// Strings are taken as-is, numbers and booleans use their display form,
/// `null` becomes empty and arrays/objects keep their JSON text. Anything
/// other than an object yields no bindings.
pub fn variables_from_json(value: &serde_json::Value) -> Variables {
    let serde_json::Value::Object(map) = value else {
        return Variables::new();
    };

    map.iter()
        .map(|(key, value)| {
            let display = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                _ => value.to_string(),
            };
            (key.clone(), display)
        })
        .collect()
}

/// Render language: `explicit` if non-empty, else a non-empty `lang`
/// binding, else `fallback`.
pub fn effective_language<'a>(
    explicit: Option<&'a str>,
    variables: &'a Variables,
    fallback: &'a str,
) -> &'a str {
    explicit
        .filter(|l| !l.is_empty())
        .or_else(|| {
            variables
                .get("lang")
                .map(String::as_str)
                .filter(|l| !l.is_empty())
        })
        .unwrap_or(fallback)
}

/// Hierarchical event identifier, e.g. `mission/created`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventPath {
    segments: Vec<String>,
}

impl EventPath {
    /// Parse a `/`-separated path. Empty segments are ignored; `.` and `..`
    /// are rejected.
    pub fn parse(path: &str) -> TemplateResult<Self> {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(TemplateError::InvalidEventPath(path.to_string()));
        }

        if segments.iter().any(|s| !is_safe_component(s)) {
            return Err(TemplateError::InvalidEventPath(path.to_string()));
        }

        Ok(Self { segments })
    }

    /// Derive the path from a notification event type.
    ///
    /// Only the first `_` is turned into a separator, so `mission_created`
    /// becomes `mission/created`, `delivery_status_update` becomes
    /// `delivery/status_update` and `mission/status_update` becomes
    /// `mission/status/update`.
    pub fn from_event_type(event_type: &str) -> TemplateResult<Self> {
        Self::parse(&event_type.replacen('_', "/", 1))
    }

    /// The shared `default` bucket
    pub fn default_bucket() -> Self {
        Self {
            segments: vec![DEFAULT_BUCKET.to_string()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for EventPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl TryFrom<String> for EventPath {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventPath> for String {
    fn from(path: EventPath) -> Self {
        path.to_string()
    }
}

/// Identifies one template file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub event_path: EventPath,
    pub channel: String,
    pub language: String,
}

impl TemplateKey {
    pub fn new(event_path: EventPath, channel: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            event_path,
            channel: channel.into(),
            language: language.into(),
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.event_path, self.channel, self.language)
    }
}

/// Maps template keys to paths relative to the store root.
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    markup_channel: String,
}

impl TemplateLayout {
    pub fn new(markup_channel: impl Into<String>) -> Self {
        Self {
            markup_channel: markup_channel.into(),
        }
    }

    pub fn markup_channel(&self) -> &str {
        &self.markup_channel
    }

    pub fn extension_for(&self, channel: &str) -> &'static str {
        if channel == self.markup_channel {
            "html"
        } else {
            "txt"
        }
    }

    /// `<segments...>/<channel>/<language>.<ext>`, or `None` when the
    /// channel or language could escape the store root.
    pub fn relative_path(&self, key: &TemplateKey) -> Option<PathBuf> {
        if !is_safe_component(&key.channel) || !is_safe_component(&key.language) {
            return None;
        }

        let mut path: PathBuf = key.event_path.segments().iter().collect();
        path.push(&key.channel);
        path.push(format!(
            "{}.{}",
            key.language,
            self.extension_for(&key.channel)
        ));
        Some(path)
    }

    /// `default/global.txt`
    pub fn catch_all_path(&self) -> PathBuf {
        Path::new(DEFAULT_BUCKET).join(CATCH_ALL_FILE)
    }
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\', '\0'])
}

/// Which fallback tier supplied the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// `(event, channel, language)`
    Exact,
    /// `(default, channel, language)`
    DefaultLanguage,
    /// `(default, channel, fallback language)`
    DefaultFallbackLanguage,
    /// `default/global.txt`
    CatchAll,
    /// Inline `Notification: {{content}}`
    BuiltIn,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Exact => "exact",
            Resolution::DefaultLanguage => "default_language",
            Resolution::DefaultFallbackLanguage => "default_fallback_language",
            Resolution::CatchAll => "catch_all",
            Resolution::BuiltIn => "built_in",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final message text plus how it was resolved
#[derive(Debug, Clone, Serialize)]
pub struct RenderedMessage {
    pub content: String,
    pub resolution: Resolution,
}
