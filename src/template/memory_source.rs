//! In-memory template source using DashMap.
//!
//! Useful for tests and for templates bundled into the binary.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;

use super::source::{TemplateLocation, TemplateSource};
use super::types::{TemplateError, TemplateKey, TemplateLayout, TemplateResult};

pub struct MemoryTemplateSource {
    templates: DashMap<PathBuf, String>,
    layout: TemplateLayout,
}

impl MemoryTemplateSource {
    pub fn new(layout: TemplateLayout) -> Self {
        Self {
            templates: DashMap::new(),
            layout,
        }
    }

    /// Store a template under the path `key` maps to.
    ///
    /// Keys whose channel or language is not a plain path component are
    /// ignored, mirroring how the filesystem source refuses to look them up.
    pub fn insert(&self, key: &TemplateKey, content: impl Into<String>) {
        if let Some(path) = self.layout.relative_path(key) {
            self.templates.insert(path, content.into());
        }
    }

    /// Store the catch-all template
    pub fn insert_catch_all(&self, content: impl Into<String>) {
        self.templates
            .insert(self.layout.catch_all_path(), content.into());
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn locate(&self, key: &TemplateKey) -> TemplateResult<Option<TemplateLocation>> {
        Ok(self
            .layout
            .relative_path(key)
            .filter(|path| self.templates.contains_key(path))
            .map(TemplateLocation::new))
    }

    async fn locate_catch_all(&self) -> TemplateResult<Option<TemplateLocation>> {
        let path = self.layout.catch_all_path();
        Ok(self
            .templates
            .contains_key(&path)
            .then(|| TemplateLocation::new(path)))
    }

    async fn read(&self, location: &TemplateLocation) -> TemplateResult<String> {
        self.templates
            .get(location.relative_path())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TemplateError::Io {
                path: location.relative_path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "template removed"),
            })
    }

    async fn list(&self) -> TemplateResult<Vec<TemplateLocation>> {
        let mut paths: Vec<PathBuf> = self
            .templates
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        paths.sort();
        Ok(paths.into_iter().map(TemplateLocation::new).collect())
    }
}
