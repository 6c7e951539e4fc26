//! Storage abstraction for raw templates.
//!
//! The engine only ever talks to a [`TemplateSource`], so the fallback
//! algorithm does not care whether templates live on disk, in memory or in
//! some other backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::types::{TemplateKey, TemplateResult};

/// Where a located template lives, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocation {
    relative: PathBuf,
}

impl TemplateLocation {
    pub fn new(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
        }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative
    }
}

/// Read-only template storage.
///
/// `locate` is a direct existence check on the exact path derived from the
/// key; implementations never do wildcard or partial matching.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Find the template for `key`, if present.
    async fn locate(&self, key: &TemplateKey) -> TemplateResult<Option<TemplateLocation>>;

    /// Find the global catch-all template, if present.
    async fn locate_catch_all(&self) -> TemplateResult<Option<TemplateLocation>>;

    /// Read a previously located template.
    async fn read(&self, location: &TemplateLocation) -> TemplateResult<String>;

    /// List every template file (`.txt` / `.html`) in the source.
    async fn list(&self) -> TemplateResult<Vec<TemplateLocation>>;
}
