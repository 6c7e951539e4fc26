//! Template preview, validation and scaffolding endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{
    effective_language, scaffold_templates, validate_templates, variables_from_json, EventPath,
    Resolution, ScaffoldReport, ValidationReport,
};

use super::notifications::ensure_known_channel;

#[derive(Debug, Deserialize)]
pub struct RenderTemplateRequest {
    pub event_type: String,
    pub channel: String,
    pub language: Option<String>,
    #[serde(default)]
    pub variables: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct RenderTemplateResponse {
    pub event_path: String,
    pub channel: String,
    pub language: String,
    pub content: String,
    pub resolution: Resolution,
}

#[derive(Debug, Deserialize)]
pub struct ScaffoldRequest {
    pub event_type: String,
    /// Defaults to every configured channel
    pub channels: Option<Vec<String>>,
    /// Defaults to every configured language
    pub languages: Option<Vec<String>>,
}

/// POST /api/v1/templates/render - Preview a rendered template
#[tracing::instrument(
    name = "http.render_template",
    skip(state, request),
    fields(event_type = %request.event_type, channel = %request.channel)
)]
pub async fn render_template(
    State(state): State<AppState>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderTemplateResponse>> {
    ensure_known_channel(&state, &request.channel)?;

    let event_path = EventPath::from_event_type(&request.event_type)?;
    let variables = variables_from_json(&request.variables);
    let language = effective_language(
        request.language.as_deref(),
        &variables,
        state.engine.fallback_language(),
    )
    .to_string();

    let rendered = state
        .engine
        .render_detailed(&event_path, &request.channel, &language, &variables)
        .await?;

    Ok(Json(RenderTemplateResponse {
        event_path: event_path.to_string(),
        channel: request.channel,
        language,
        content: rendered.content,
        resolution: rendered.resolution,
    }))
}

/// GET /api/v1/templates/validation - Lint every stored template
#[tracing::instrument(name = "http.validate_templates", skip(state))]
pub async fn validate_all_templates(
    State(state): State<AppState>,
) -> Result<Json<ValidationReport>> {
    let source = state.template_source.as_ref();
    let report = validate_templates(source, source.layout()).await?;
    Ok(Json(report))
}

/// POST /api/v1/templates/scaffold - Create missing template files
#[tracing::instrument(
    name = "http.scaffold_templates",
    skip(state, request),
    fields(event_type = %request.event_type)
)]
pub async fn scaffold(
    State(state): State<AppState>,
    Json(request): Json<ScaffoldRequest>,
) -> Result<(StatusCode, Json<ScaffoldReport>)> {
    let templates = &state.settings.templates;
    let channels = request.channels.unwrap_or_else(|| templates.channels.clone());
    let languages = request.languages.unwrap_or_else(|| templates.languages.clone());

    if channels.is_empty() || languages.is_empty() {
        return Err(AppError::Validation(
            "At least one channel and one language are required".to_string(),
        ));
    }
    for channel in &channels {
        ensure_known_channel(&state, channel)?;
    }
    if let Some(language) = languages.iter().find(|l| !templates.is_known_language(l)) {
        return Err(AppError::Validation(format!(
            "Unknown language '{}', expected one of: {}",
            language,
            templates.languages.join(", ")
        )));
    }

    let event_path = EventPath::from_event_type(&request.event_type)?;
    let report =
        scaffold_templates(&state.template_source, &event_path, &channels, &languages).await?;

    let status = if report.created.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(report)))
}
