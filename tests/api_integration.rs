//! HTTP API tests driving the router in-process.

use std::path::Path;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use onelog_notification_service::config::Settings;
use onelog_notification_service::server::{create_app, AppState};

fn app_for(root: &Path) -> Router {
    let mut settings = Settings::default();
    settings.templates.base_path = root.to_path_buf();
    create_app(AppState::new(settings, None))
}

fn write_template(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn test_health_reports_template_directory() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["templates"]["available"], true);
    assert_eq!(body["templates"]["fallback_language"], "fr");
}

#[tokio::test]
async fn test_send_notification_endpoint() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "mission/created/sms/fr.txt", "Mission {{missionId}} créée");
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/notifications/send",
        Some(json!({
            "event_type": "mission_created",
            "recipient": "+221770000000",
            "channel": "sms",
            "variables": {"missionId": 42}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "status": "sent"}));

    let (_, stats) = call(&app, Method::GET, "/stats", None).await;
    assert_eq!(stats["notifications"]["sent"], 1);
    assert_eq!(stats["preference_backend"], "memory");
    assert_eq!(stats["audit_backend"], "log");
}

#[tokio::test]
async fn test_unknown_channel_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/notifications/send",
        Some(json!({
            "event_type": "mission_created",
            "recipient": "x",
            "channel": "pigeon"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_render_preview_reports_resolution() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "default/whatsapp/fr.txt", "Bonjour {{clientName}}");
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/templates/render",
        Some(json!({
            "event_type": "mission/created",
            "channel": "whatsapp",
            "language": "de",
            "variables": {"clientName": "Jean"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Bonjour Jean");
    assert_eq!(body["resolution"], "default_fallback_language");
    assert_eq!(body["language"], "de");
}

#[tokio::test]
async fn test_render_preview_uses_lang_variable() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "mission/created/sms/en.txt", "Mission {{missionId}} created");
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/templates/render",
        Some(json!({
            "event_type": "mission_created",
            "channel": "sms",
            "language": "",
            "variables": {"missionId": 9, "lang": "en"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "en");
    assert_eq!(body["content"], "Mission 9 created");
    assert_eq!(body["resolution"], "exact");
}

#[tokio::test]
async fn test_render_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/templates/render",
        Some(json!({"event_type": "../secrets", "channel": "sms"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TEMPLATE_KEY");
}

#[tokio::test]
async fn test_scaffold_then_validate() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/templates/scaffold",
        Some(json!({
            "event_type": "invoice_paid",
            "channels": ["sms", "email"],
            "languages": ["fr"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"].as_array().unwrap().len(), 2);
    assert!(dir.path().join("invoice/paid/email/fr.html").exists());

    // Second call leaves existing files alone
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/templates/scaffold",
        Some(json!({
            "event_type": "invoice_paid",
            "channels": ["sms"],
            "languages": ["fr"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["existing"], json!(["invoice/paid/sms/fr.txt"]));

    write_template(dir.path(), "invoice/paid/whatsapp/fr.txt", "Montant {{ amount-due }}");
    let (status, report) = call(&app, Method::GET, "/api/v1/templates/validation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["ok"], 2);
    assert_eq!(report["warnings"], 1);
    assert_eq!(report["errors"], 0);
}

#[tokio::test]
async fn test_preference_endpoints() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    let (status, _) = call(&app, Method::GET, "/api/v1/preferences/user-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/preferences/user-1/channels/sms",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], true);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/preferences/user-1",
        Some(json!({"sms_enabled": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sms_enabled"], false);
    assert_eq!(body["email_enabled"], true);

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/v1/preferences/user-1/channels/sms",
        None,
    )
    .await;
    assert_eq!(body["enabled"], false);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/notifications/send",
        Some(json!({
            "event_type": "mission_created",
            "recipient": "+221",
            "channel": "sms",
            "user_id": "user-1"
        })),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "skipped");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = app_for(dir.path());

    call(
        &app,
        Method::POST,
        "/api/v1/templates/render",
        Some(json!({"event_type": "mission_created", "channel": "sms"})),
    )
    .await;

    let (status, body) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("onelog_template_resolutions_total"));
}
