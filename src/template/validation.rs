//! Template lint: render every stored template with sample data and report
//! anything that would reach a recipient with raw placeholders.

use std::path::Path;

use futures::future::join_all;
use serde::Serialize;

use super::source::{TemplateLocation, TemplateSource};
use super::substitution::{leftover_placeholders, substitute_variables};
use super::types::{TemplateLayout, TemplateResult, Variables, CATCH_ALL_FILE, DEFAULT_BUCKET};

/// Bindings used to exercise every template
pub fn sample_variables() -> Variables {
    [
        ("clientName", "Test Client"),
        ("missionId", "12345"),
        ("date", "2025-06-23"),
        ("deliveryDate", "2025-06-24"),
        ("amount", "100000"),
        ("currency", "XOF"),
        ("status", "En cours"),
        ("content", "Contenu générique"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationEntry {
    pub path: String,
    pub status: ValidationStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
    pub ok: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ValidationReport {
    fn from_entries(entries: Vec<ValidationEntry>) -> Self {
        let count = |status: ValidationStatus| entries.iter().filter(|e| e.status == status).count();
        let ok = count(ValidationStatus::Ok);
        let warnings = count(ValidationStatus::Warning);
        let errors = count(ValidationStatus::Error);
        Self {
            entries,
            ok,
            warnings,
            errors,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings == 0 && self.errors == 0
    }
}

/// Check every template the source lists.
#[tracing::instrument(name = "template.validate", skip_all, fields(backend = source.backend_name()))]
pub async fn validate_templates(
    source: &dyn TemplateSource,
    layout: &TemplateLayout,
) -> TemplateResult<ValidationReport> {
    let locations = source.list().await?;
    let variables = sample_variables();

    let entries = join_all(
        locations
            .iter()
            .map(|location| validate_one(source, layout, location, &variables)),
    )
    .await;

    let report = ValidationReport::from_entries(entries);
    tracing::info!(
        ok = report.ok,
        warnings = report.warnings,
        errors = report.errors,
        "Template validation finished"
    );
    Ok(report)
}

async fn validate_one(
    source: &dyn TemplateSource,
    layout: &TemplateLayout,
    location: &TemplateLocation,
    variables: &Variables,
) -> ValidationEntry {
    let relative = location.relative_path();
    let path = relative.to_string_lossy().replace('\\', "/");

    if let Some(problem) = layout_problem(layout, relative) {
        return ValidationEntry {
            path,
            status: ValidationStatus::Warning,
            message: problem,
        };
    }

    let template = match source.read(location).await {
        Ok(template) => template,
        Err(e) => {
            return ValidationEntry {
                path,
                status: ValidationStatus::Error,
                message: e.to_string(),
            }
        }
    };

    let rendered = substitute_variables(&template, variables);
    let leftovers = leftover_placeholders(&rendered);

    if leftovers.is_empty() {
        ValidationEntry {
            path,
            status: ValidationStatus::Ok,
            message: rendered.replace('\n', " | "),
        }
    } else {
        ValidationEntry {
            path,
            status: ValidationStatus::Warning,
            message: format!("unreplaced placeholders: {}", leftovers.join(", ")),
        }
    }
}

/// Files the engine would never pick up because of their location or name
fn layout_problem(layout: &TemplateLayout, relative: &Path) -> Option<String> {
    if relative == layout.catch_all_path() {
        return None;
    }

    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if components.len() < 3 {
        if components.first().map(String::as_str) == Some(DEFAULT_BUCKET) {
            return Some(format!(
                "only {} is read directly under the default bucket",
                CATCH_ALL_FILE
            ));
        }
        return Some("expected <event>/<channel>/<language>.<ext>".to_string());
    }

    let channel = &components[components.len() - 2];
    let expected = layout.extension_for(channel);
    let actual = relative.extension().and_then(|e| e.to_str()).unwrap_or("");

    if actual != expected {
        return Some(format!(
            "channel '{}' templates must use .{}, found .{}",
            channel, expected, actual
        ));
    }

    None
}
