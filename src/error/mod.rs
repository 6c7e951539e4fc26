use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::preference::PreferenceError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

fn masked(log_msg: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        log_msg.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = match &self {
            AppError::Config(e) => {
                let log_msg = e.to_string();
                let client_msg = masked(&log_msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", client_msg, log_msg)
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Internal(e) => {
                let client_msg = masked(e, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", client_msg, e.clone())
            }
            AppError::Template(e @ (TemplateError::InvalidEventPath(_) | TemplateError::InvalidKey(_))) => (
                StatusCode::BAD_REQUEST,
                "INVALID_TEMPLATE_KEY",
                e.to_string(),
                e.to_string(),
            ),
            AppError::Template(e @ TemplateError::Io { .. }) => {
                let log_msg = e.to_string();
                let client_msg = masked(&log_msg, "Template storage unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_STORAGE_ERROR", client_msg, log_msg)
            }
            AppError::Preference(e) => {
                let log_msg = e.to_string();
                let client_msg = masked(&log_msg, "Service temporarily unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "PREFERENCE_STORE_ERROR", client_msg, log_msg)
            }
        };

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("user".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(TemplateError::InvalidKey("..".into()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(PreferenceError::Unavailable("down".into()))
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
