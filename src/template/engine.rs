//! Template resolution with language and bucket fallback.

use std::sync::Arc;

use crate::config::TemplatesConfig;
use crate::metrics::TemplateMetrics;

use super::source::TemplateSource;
use super::substitution::substitute_variables;
use super::types::{
    EventPath, RenderedMessage, Resolution, TemplateKey, TemplateResult, Variables,
    BUILTIN_FALLBACK,
};

/// Renders notification text from a [`TemplateSource`].
///
/// Resolution order, first hit wins:
///
/// 1. `(event, channel, language)`
/// 2. `(default, channel, language)`
/// 3. `(default, channel, fallback language)`
/// 4. `default/global.txt`
/// 5. `Notification: {{content}}`
///
/// A missing template never fails a render. Only a storage error does.
pub struct TemplateEngine {
    source: Arc<dyn TemplateSource>,
    fallback_language: String,
}

impl TemplateEngine {
    pub fn new(source: Arc<dyn TemplateSource>, config: &TemplatesConfig) -> Self {
        Self {
            source,
            fallback_language: config.fallback_language.clone(),
        }
    }

    pub fn fallback_language(&self) -> &str {
        &self.fallback_language
    }

    pub fn source(&self) -> &Arc<dyn TemplateSource> {
        &self.source
    }

    /// Render the message text for an event.
    pub async fn render(
        &self,
        event_path: &EventPath,
        channel: &str,
        language: &str,
        variables: &Variables,
    ) -> TemplateResult<String> {
        self.render_detailed(event_path, channel, language, variables)
            .await
            .map(|rendered| rendered.content)
    }

    /// Render and report which fallback tier supplied the template.
    #[tracing::instrument(
        name = "template.render",
        skip(self, variables),
        fields(event_path = %event_path, resolution = tracing::field::Empty)
    )]
    pub async fn render_detailed(
        &self,
        event_path: &EventPath,
        channel: &str,
        language: &str,
        variables: &Variables,
    ) -> TemplateResult<RenderedMessage> {
        let (template, resolution) = self.resolve(event_path, channel, language).await?;

        tracing::Span::current().record("resolution", resolution.as_str());
        TemplateMetrics::record_resolution(resolution.as_str());

        if resolution != Resolution::Exact {
            tracing::debug!(
                event_path = %event_path,
                channel = %channel,
                language = %language,
                resolution = %resolution,
                "Exact template missing, used fallback"
            );
        }

        Ok(RenderedMessage {
            content: substitute_variables(&template, variables),
            resolution,
        })
    }

    async fn resolve(
        &self,
        event_path: &EventPath,
        channel: &str,
        language: &str,
    ) -> TemplateResult<(String, Resolution)> {
        let mut candidates = vec![
            (
                TemplateKey::new(event_path.clone(), channel, language),
                Resolution::Exact,
            ),
            (
                TemplateKey::new(EventPath::default_bucket(), channel, language),
                Resolution::DefaultLanguage,
            ),
        ];

        if language != self.fallback_language {
            candidates.push((
                TemplateKey::new(EventPath::default_bucket(), channel, &self.fallback_language),
                Resolution::DefaultFallbackLanguage,
            ));
        }

        for (key, resolution) in candidates {
            if let Some(location) = self.source.locate(&key).await? {
                let template = self.source.read(&location).await?;
                return Ok((template, resolution));
            }
        }

        if let Some(location) = self.source.locate_catch_all().await? {
            let template = self.source.read(&location).await?;
            return Ok((template, Resolution::CatchAll));
        }

        Ok((BUILTIN_FALLBACK.to_string(), Resolution::BuiltIn))
    }
}
