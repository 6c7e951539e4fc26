use std::env;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Template store and language resolution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Root directory of the template hierarchy
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// Language used when the requested one has no template
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
    /// Channel whose templates are HTML (`.html`) instead of plain text
    #[serde(default = "default_markup_channel")]
    pub markup_channel: String,
    /// Recognized channels
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    /// Recognized languages
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    /// `memory` or `postgres`
    #[serde(default = "default_memory_backend")]
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// `log`, `memory` or `postgres`
    #[serde(default = "default_audit_backend")]
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_base_path() -> PathBuf {
    PathBuf::from("templates")
}

fn default_fallback_language() -> String {
    "fr".to_string()
}

fn default_markup_channel() -> String {
    "email".to_string()
}

fn default_channels() -> Vec<String> {
    vec!["email".to_string(), "sms".to_string(), "whatsapp".to_string()]
}

fn default_languages() -> Vec<String> {
    vec!["fr".to_string(), "en".to_string()]
}

fn default_memory_backend() -> String {
    "memory".to_string()
}

fn default_audit_backend() -> String {
    "log".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_idle_timeout() -> u32 {
    300
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("templates.base_path", "templates")?
            .set_default("templates.fallback_language", "fr")?
            .set_default("templates.markup_channel", "email")?
            .set_default("templates.channels", default_channels())?
            .set_default("templates.languages", default_languages())?
            .set_default("preferences.backend", "memory")?
            .set_default("audit.backend", "log")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // TEMPLATES__BASE_PATH, TEMPLATES__CHANNELS=email,sms, SERVER__PORT, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("templates.channels")
                    .with_list_parse_key("templates.languages")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl TemplatesConfig {
    /// Whether `channel` is in the recognized channel list
    pub fn is_known_channel(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }

    /// Whether `language` is in the recognized language list
    pub fn is_known_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            fallback_language: default_fallback_language(),
            markup_channel: default_markup_channel(),
            channels: default_channels(),
            languages: default_languages(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            backend: default_memory_backend(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: default_audit_backend(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            templates: TemplatesConfig::default(),
            preferences: PreferencesConfig::default(),
            audit: AuditConfig::default(),
            database: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8081);
    }

    #[test]
    fn test_template_defaults() {
        let templates = TemplatesConfig::default();
        assert_eq!(templates.base_path, PathBuf::from("templates"));
        assert_eq!(templates.fallback_language, "fr");
        assert_eq!(templates.channels, vec!["email", "sms", "whatsapp"]);
        assert_eq!(templates.languages, vec!["fr", "en"]);
    }

    #[test]
    fn test_known_channels_and_languages() {
        let templates = TemplatesConfig::default();
        assert!(templates.is_known_channel("sms"));
        assert!(!templates.is_known_channel("pigeon"));
        assert!(templates.is_known_language("en"));
        assert!(!templates.is_known_language("de"));
    }
}
