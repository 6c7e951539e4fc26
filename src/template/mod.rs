//! Notification template system.
//!
//! This module provides:
//! - Template keys `(event path, channel, language)` mapped to files
//!   `<event>/<channel>/<language>.txt|.html`
//! - Read-only template sources (filesystem, in-memory)
//! - The rendering engine with its fallback chain
//! - `{{variable}}` substitution
//! - Validation and scaffolding helpers for template authors
//!
//! # Example
//!
//! ```ignore
//! let source = Arc::new(FsTemplateSource::new(&settings.templates));
//! let engine = TemplateEngine::new(source, &settings.templates);
//!
//! let mut variables = Variables::new();
//! variables.insert("clientName".to_string(), "Jean".to_string());
//!
//! let text = engine
//!     .render(&EventPath::parse("mission/created")?, "whatsapp", "fr", &variables)
//!     .await?;
//! ```

mod engine;
mod fs_source;
mod memory_source;
mod scaffold;
mod source;
mod substitution;
mod types;
mod validation;

pub use engine::TemplateEngine;
pub use fs_source::FsTemplateSource;
pub use memory_source::MemoryTemplateSource;
pub use scaffold::{scaffold_templates, ScaffoldReport};
pub use source::{TemplateLocation, TemplateSource};
pub use substitution::{leftover_placeholders, substitute_variables};
pub use types::{
    effective_language, variables_from_json, EventPath, RenderedMessage, Resolution, TemplateError, TemplateKey,
    TemplateLayout, TemplateResult, Variables, BUILTIN_FALLBACK, CATCH_ALL_FILE, DEFAULT_BUCKET,
};
pub use validation::{
    sample_variables, validate_templates, ValidationEntry, ValidationReport, ValidationStatus,
};
