//! Filesystem-backed template source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::TemplatesConfig;

use super::source::{TemplateLocation, TemplateSource};
use super::types::{TemplateError, TemplateKey, TemplateLayout, TemplateResult};

/// Reads templates from a directory tree rooted at `base_path`.
///
/// Files are read on every call; there is no cache.
pub struct FsTemplateSource {
    base_path: PathBuf,
    layout: TemplateLayout,
}

impl FsTemplateSource {
    pub fn new(config: &TemplatesConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            layout: TemplateLayout::new(config.markup_channel.clone()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    async fn existing(&self, relative: PathBuf) -> TemplateResult<Option<TemplateLocation>> {
        let full = self.base_path.join(&relative);
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => Ok(Some(TemplateLocation::new(relative))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TemplateError::Io {
                path: full,
                source: e,
            }),
        }
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn locate(&self, key: &TemplateKey) -> TemplateResult<Option<TemplateLocation>> {
        match self.layout.relative_path(key) {
            Some(relative) => self.existing(relative).await,
            None => Ok(None),
        }
    }

    async fn locate_catch_all(&self) -> TemplateResult<Option<TemplateLocation>> {
        self.existing(self.layout.catch_all_path()).await
    }

    async fn read(&self, location: &TemplateLocation) -> TemplateResult<String> {
        let full = self.base_path.join(location.relative_path());
        let bytes = tokio::fs::read(&full).await.map_err(|e| TemplateError::Io {
            path: full.clone(),
            source: e,
        })?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(
                    path = %full.display(),
                    valid_up_to = e.utf8_error().valid_up_to(),
                    "Template is not valid UTF-8, decoding lossily"
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }

    async fn list(&self) -> TemplateResult<Vec<TemplateLocation>> {
        let mut found = Vec::new();
        let mut pending = vec![PathBuf::new()];

        while let Some(relative_dir) = pending.pop() {
            let dir = self.base_path.join(&relative_dir);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // A missing root simply means no templates
                Err(e) if e.kind() == ErrorKind::NotFound && relative_dir.as_os_str().is_empty() => {
                    return Ok(found);
                }
                Err(e) => return Err(TemplateError::Io { path: dir, source: e }),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| TemplateError::Io {
                    path: dir.clone(),
                    source: e,
                })?
            {
                let relative = relative_dir.join(entry.file_name());
                let file_type = entry.file_type().await.map_err(|e| TemplateError::Io {
                    path: entry.path(),
                    source: e,
                })?;

                if file_type.is_dir() {
                    pending.push(relative);
                } else if is_template_file(&relative) {
                    found.push(TemplateLocation::new(relative));
                }
            }
        }

        found.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        Ok(found)
    }
}

fn is_template_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("txt") | Some("html")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::EventPath;

    fn source_in(dir: &Path) -> FsTemplateSource {
        FsTemplateSource::new(&TemplatesConfig {
            base_path: dir.to_path_buf(),
            ..TemplatesConfig::default()
        })
    }

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_locate_and_read_exact() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mission/created/whatsapp/fr.txt", "Bonjour {{clientName}}");
        let source = source_in(dir.path());

        let key = TemplateKey::new(EventPath::parse("mission/created").unwrap(), "whatsapp", "fr");
        let location = source.locate(&key).await.unwrap().unwrap();
        assert_eq!(
            location.relative_path(),
            Path::new("mission/created/whatsapp/fr.txt")
        );
        assert_eq!(source.read(&location).await.unwrap(), "Bonjour {{clientName}}");
    }

    #[tokio::test]
    async fn test_email_uses_html_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mission/created/email/fr.txt", "wrong extension");
        let source = source_in(dir.path());

        let key = TemplateKey::new(EventPath::parse("mission/created").unwrap(), "email", "fr");
        assert!(source.locate(&key).await.unwrap().is_none());

        write(dir.path(), "mission/created/email/fr.html", "<p>ok</p>");
        assert!(source.locate(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_template_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());

        let key = TemplateKey::new(EventPath::parse("order/shipped").unwrap(), "sms", "en");
        assert!(source.locate(&key).await.unwrap().is_none());
        assert!(source.locate_catch_all().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("default/global.txt")).unwrap();
        let source = source_in(dir.path());

        assert!(source.locate_catch_all().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_walks_tree() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mission/created/sms/fr.txt", "a");
        write(dir.path(), "mission/created/email/en.html", "b");
        write(dir.path(), "default/global.txt", "{{content}}");
        write(dir.path(), "README.md", "not a template");
        let source = source_in(dir.path());

        let listed: Vec<PathBuf> = source
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.relative_path().to_path_buf())
            .collect();

        assert_eq!(
            listed,
            vec![
                PathBuf::from("default/global.txt"),
                PathBuf::from("mission/created/email/en.html"),
                PathBuf::from("mission/created/sms/fr.txt"),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mission/created/sms/fr.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"Cr\xe9\xe9e {{x}}").unwrap();

        let source = source_in(dir.path());
        let key = TemplateKey::new(EventPath::parse("mission/created").unwrap(), "sms", "fr");
        let location = source.locate(&key).await.unwrap().unwrap();

        let text = source.read(&location).await.unwrap();
        assert_eq!(text, "Cr\u{FFFD}\u{FFFD}e {{x}}");
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(&dir.path().join("absent"));
        assert!(source.list().await.unwrap().is_empty());
    }
}
