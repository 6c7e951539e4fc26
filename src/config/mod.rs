mod settings;

pub use settings::{
    AuditConfig, DatabaseConfig, LoggingConfig, PreferencesConfig, ServerConfig, Settings,
    TemplatesConfig,
};
