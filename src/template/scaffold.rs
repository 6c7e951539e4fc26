//! Create starter template files for a new event.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::fs_source::FsTemplateSource;
use super::types::{EventPath, TemplateError, TemplateKey, TemplateResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScaffoldReport {
    /// Files written by this call
    pub created: Vec<String>,
    /// Files that already existed and were left untouched
    pub existing: Vec<String>,
}

/// Write a starter template for every `(channel, language)` pair under
/// `event_path`. Existing files are never overwritten.
#[tracing::instrument(name = "template.scaffold", skip(source), fields(event_path = %event_path))]
pub async fn scaffold_templates(
    source: &FsTemplateSource,
    event_path: &EventPath,
    channels: &[String],
    languages: &[String],
) -> TemplateResult<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for channel in channels {
        for language in languages {
            let key = TemplateKey::new(event_path.clone(), channel.as_str(), language.as_str());
            let relative = source
                .layout()
                .relative_path(&key)
                .ok_or_else(|| TemplateError::InvalidKey(key.to_string()))?;
            let full = source.base_path().join(&relative);
            let shown = relative.to_string_lossy().replace('\\', "/");

            if let Some(parent) = full.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error(parent, e))?;
            }

            let body = starter_body(event_path, channel, language, source.layout().markup_channel());
            if write_new(&full, &body).await? {
                tracing::info!(path = %shown, "Template created");
                report.created.push(shown);
            } else {
                report.existing.push(shown);
            }
        }
    }

    Ok(report)
}

/// Write `body` to `path` unless a file is already there.
///
/// Returns `false` when the file existed.
async fn write_new(path: &Path, body: &str) -> TemplateResult<bool> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(io_error(path, e)),
    };

    file.write_all(body.as_bytes())
        .await
        .map_err(|e| io_error(path, e))?;
    file.flush().await.map_err(|e| io_error(path, e))?;
    Ok(true)
}

/// Starter content: a per-channel default for French and English, else a
/// generic line around `{{content}}`.
fn starter_body(event_path: &EventPath, channel: &str, language: &str, markup_channel: &str) -> String {
    if let Some(text) = channel_default(channel, language) {
        return text.to_string();
    }

    let text = format!(
        "Template for {} ({}, {}): {{{{content}}}}",
        event_path, channel, language
    );

    if channel == markup_channel {
        format!("<html><body><p>{}</p></body></html>", text)
    } else {
        text
    }
}

fn channel_default(channel: &str, language: &str) -> Option<&'static str> {
    let text = match (channel, language) {
        ("whatsapp", "fr") => "Bonjour {{clientName}}, votre mission {{missionId}} a été clôturée. Merci d'avoir utilisé OneLog Africa.",
        ("whatsapp", "en") => "Hello {{clientName}}, your mission {{missionId}} has been closed. Thank you for using OneLog Africa.",
        ("sms", "fr") => "Mission {{missionId}} clôturée. Merci.",
        ("sms", "en") => "Mission {{missionId}} closed. Thank you.",
        ("email", "fr") => "<html><body><p>Bonjour <b>{{clientName}}</b>,</p><p>Votre mission <b>#{{missionId}}</b> a été clôturée.</p><p>Merci pour votre confiance.<br/>L'équipe OneLog Africa</p></body></html>",
        ("email", "en") => "<html><body><p>Hello <b>{{clientName}}</b>,</p><p>Your mission <b>#{{missionId}}</b> has been closed.</p><p>Thank you for your trust.<br/>The OneLog Africa team</p></body></html>",
        _ => return None,
    };
    Some(text)
}

fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> TemplateError {
    TemplateError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplatesConfig;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scaffold_creates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsTemplateSource::new(&TemplatesConfig {
            base_path: dir.path().to_path_buf(),
            ..TemplatesConfig::default()
        });

        let event = EventPath::parse("mission/closed").unwrap();
        std::fs::create_dir_all(dir.path().join("mission/closed/sms")).unwrap();
        std::fs::write(dir.path().join("mission/closed/sms/fr.txt"), "custom").unwrap();

        let report = scaffold_templates(&source, &event, &strings(&["sms", "email"]), &strings(&["fr", "en"]))
            .await
            .unwrap();

        assert_eq!(report.existing, vec!["mission/closed/sms/fr.txt"]);
        assert_eq!(
            report.created,
            vec![
                "mission/closed/sms/en.txt",
                "mission/closed/email/fr.html",
                "mission/closed/email/en.html",
            ]
        );

        let untouched = std::fs::read_to_string(dir.path().join("mission/closed/sms/fr.txt")).unwrap();
        assert_eq!(untouched, "custom");

        let html = std::fs::read_to_string(dir.path().join("mission/closed/email/en.html")).unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains("{{missionId}}"));
    }

    #[tokio::test]
    async fn test_scaffold_keeps_file_created_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsTemplateSource::new(&TemplatesConfig {
            base_path: dir.path().to_path_buf(),
            ..TemplatesConfig::default()
        });
        let event = EventPath::parse("mission/closed").unwrap();
        let target = dir.path().join("mission/closed/sms/wo.txt");

        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        assert!(write_new(&target, "first").await.unwrap());
        assert!(!write_new(&target, "second").await.unwrap());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "first");

        let report = scaffold_templates(&source, &event, &strings(&["sms"]), &strings(&["wo"]))
            .await
            .unwrap();
        assert_eq!(report.existing, vec!["mission/closed/sms/wo.txt"]);
        assert!(report.created.is_empty());
    }

    #[tokio::test]
    async fn test_scaffold_rejects_unsafe_channel() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsTemplateSource::new(&TemplatesConfig {
            base_path: dir.path().to_path_buf(),
            ..TemplatesConfig::default()
        });
        let event = EventPath::parse("mission/closed").unwrap();

        let result = scaffold_templates(&source, &event, &strings(&[".."]), &strings(&["fr"])).await;
        assert!(matches!(result, Err(TemplateError::InvalidKey(_))));
    }

    #[test]
    fn test_starter_body() {
        let event = EventPath::parse("mission/closed").unwrap();
        assert_eq!(
            starter_body(&event, "sms", "fr", "email"),
            "Mission {{missionId}} clôturée. Merci."
        );
        assert_eq!(
            starter_body(&event, "sms", "wo", "email"),
            "Template for mission/closed (sms, wo): {{content}}"
        );
        assert_eq!(
            starter_body(&event, "email", "wo", "email"),
            "<html><body><p>Template for mission/closed (email, wo): {{content}}</p></body></html>"
        );
    }
}
