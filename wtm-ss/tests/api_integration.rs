//! Integration tests for the Splitsheet Service API
//!
//! Tests the complete API surface including:
//! - Health checks
//! - Working-copy lifecycle
//! - Participant and role editing with invariant enforcement
//! - Summary computation
//! - Submission gating and working-copy preservation on failure

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;
use wtm_common::config::ServiceConfig;
use wtm_ss::{build_router, AppState};

/// Test router with an unreachable submission endpoint, so any submit
/// that passes validation fails at transport without touching the network
/// beyond a refused local connect
fn test_app() -> axum::Router {
    let config = ServiceConfig {
        submission_url: "http://127.0.0.1:1/api/splitsheets".to_string(),
        submission_timeout_secs: 2,
        ..ServiceConfig::default()
    };
    build_router(AppState::new(&config))
}

async fn request(
    app: &axum::Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    use axum::body::Body;
    use axum::http::{Method, Request};

    let method = match method {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        _ => panic!("Unsupported method"),
    };

    let mut builder = Request::builder().method(method).uri(path);
    let request = if let Some(body) = body {
        builder = builder.header("content-type", "application/json");
        builder.body(Body::from(body.to_string())).unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };
    (status, value)
}

/// Create a session and return its id
async fn create_sheet(app: &axum::Router) -> String {
    let (status, body) = request(app, "POST", "/splitsheet", None).await;
    assert_eq!(status, StatusCode::OK);
    body.unwrap()["id"].as_str().unwrap().to_string()
}

/// Add a participant with complete contact fields, return its id
async fn add_complete_participant(app: &axum::Router, sheet: &str, name: &str) -> String {
    let (status, body) = request(app, "POST", &format!("/splitsheet/{sheet}/participants"), None).await;
    assert_eq!(status, StatusCode::OK);
    let pid = body.unwrap()["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{pid}"),
        Some(json!({
            "name": name,
            "email": "artist@example.com",
            "address": "17 Great George Street, Roseau",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    pid
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "wtm-ss");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = test_app();
    let (status, body) = request(
        &app,
        "GET",
        "/splitsheet/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_sheet_field_updates() {
    let app = test_app();
    let sheet = create_sheet(&app).await;

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}"),
        Some(json!({
            "title": "Carnival Sunrise",
            "release_id": "dm-a0d-24-01-001",
            "agreement_date": "2026-08-26",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["title"], "Carnival Sunrise");
    // Identifier normalized to uppercase on write
    assert_eq!(body["release_id"], "DM-A0D-24-01-001");
}

#[tokio::test]
async fn test_role_lifecycle_and_entry_ids() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}"),
        Some(json!({"release_id": "DM-A0D-24-01-001"})),
    )
    .await;
    let pid = add_complete_participant(&app, &sheet, "Maya Charles").await;

    // Role defaults to songwriting at 0%
    let (status, body) = request(
        &app,
        "POST",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let role = body.unwrap();
    assert_eq!(role["category"], "songwriting");
    assert_eq!(role["percent"], 0.0);
    assert_eq!(role["entry_id"], "WM-SSA-WC-DM-A0D-24-01-001-001");

    // Category change regenerates the entry identifier
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles/0"),
        Some(json!({"category": "publishing", "percent": 40.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let role = body.unwrap();
    assert_eq!(role["entry_id"], "WM-SSA-PD-DM-A0D-24-01-001-001");
    assert_eq!(role["percent"], 40.0);
}

#[tokio::test]
async fn test_duplicate_category_is_conflict() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    let pid = add_complete_participant(&app, &sheet, "Maya Charles").await;

    let path = format!("/splitsheet/{sheet}/participants/{pid}/roles");
    let (status, _) = request(&app, "POST", &path, Some(json!({"category": "publishing"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        request(&app, "POST", &path, Some(json!({"category": "publishing"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.unwrap()["error"], "duplicate_role");
}

#[tokio::test]
async fn test_zero_weight_role_percent_not_editable() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    let pid = add_complete_participant(&app, &sheet, "Maya Charles").await;

    request(
        &app,
        "POST",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles"),
        Some(json!({"category": "recording-performance"})),
    )
    .await;
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles/0"),
        Some(json!({"percent": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "fixed_zero_category");
}

#[tokio::test]
async fn test_rejected_role_update_is_not_partially_applied() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    let pid = add_complete_participant(&app, &sheet, "Maya Charles").await;

    request(
        &app,
        "POST",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles"),
        Some(json!({"category": "songwriting"})),
    )
    .await;

    // A combined update whose percent step fails (fixed-zero category)
    // must leave the role exactly as it was, category included
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles/0"),
        Some(json!({"category": "recording-performance", "percent": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "fixed_zero_category");

    let (status, body) = request(&app, "GET", &format!("/splitsheet/{sheet}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let role = &body.unwrap()["participants"][0]["roles"][0];
    assert_eq!(role["category"], "songwriting");
    assert_eq!(role["percent"], 0.0);
}

#[tokio::test]
async fn test_summary_reports_shares_and_issues() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}"),
        Some(json!({"title": "Riddim Rising", "release_id": "DM-A0D-24-01-001"})),
    )
    .await;
    let pid = add_complete_participant(&app, &sheet, "Maya Charles").await;
    request(
        &app,
        "POST",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles"),
        Some(json!({"category": "songwriting"})),
    )
    .await;
    request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{pid}/roles/0"),
        Some(json!({"percent": 60.0})),
    )
    .await;

    let (status, body) = request(&app, "GET", &format!("/splitsheet/{sheet}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    let summary = body.unwrap();
    assert_eq!(summary["sums"]["songwriting"], 60.0);
    assert_eq!(summary["shares"]["songwriting_weighted"], 30.0);
    // No executive-production role: platform default, excluded from total
    assert_eq!(summary["executive_label"], "Wai'tuMusic default");
    assert_eq!(summary["shares"]["executive_production"], 100.0);
    assert_eq!(summary["shares"]["total_work_percent"], 30.0);
    assert_eq!(summary["balanced"], false);
    assert!(summary["reference_number"]
        .as_str()
        .unwrap()
        .starts_with("WM-SS-DMA0D-"));
    // The songwriting cap violation shows up in the issue list
    let issues: Vec<String> = summary["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(issues.iter().any(|m| m.contains("songwriting")));
}

#[tokio::test]
async fn test_submit_blocked_by_first_failing_gate() {
    let app = test_app();
    let sheet = create_sheet(&app).await;

    let (status, body) =
        request(&app, "POST", &format!("/splitsheet/{sheet}/submit"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["message"], "song title is required");

    // The working copy survives the failed submission
    let (status, _) = request(&app, "GET", &format!("/splitsheet/{sheet}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_submit_transport_failure_preserves_working_copy() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}"),
        Some(json!({"title": "Carnival Sunrise", "release_id": "DM-A0D-24-01-001"})),
    )
    .await;

    // Balanced allocation: composition at caps (37.5) + publishing 125 (62.5)
    let writer = add_complete_participant(&app, &sheet, "Maya Charles").await;
    for (category, percent, index) in [
        ("songwriting", 50.0, 0),
        ("melody-creation", 25.0, 1),
        ("beat-composition", 25.0, 2),
        ("publishing", 25.0, 3),
    ] {
        request(
            &app,
            "POST",
            &format!("/splitsheet/{sheet}/participants/{writer}/roles"),
            Some(json!({"category": category})),
        )
        .await;
        request(
            &app,
            "PUT",
            &format!("/splitsheet/{sheet}/participants/{writer}/roles/{index}"),
            Some(json!({"percent": percent})),
        )
        .await;
    }
    let publisher = add_complete_participant(&app, &sheet, "Janet Azzouz").await;
    request(
        &app,
        "POST",
        &format!("/splitsheet/{sheet}/participants/{publisher}/roles"),
        Some(json!({"category": "publishing"})),
    )
    .await;
    request(
        &app,
        "PUT",
        &format!("/splitsheet/{sheet}/participants/{publisher}/roles/0"),
        Some(json!({"percent": 100.0})),
    )
    .await;

    // Sanity: the sheet is balanced and passes every gate
    let (_, summary) = request(&app, "GET", &format!("/splitsheet/{sheet}/summary"), None).await;
    let summary = summary.unwrap();
    assert_eq!(summary["balanced"], true);
    assert_eq!(summary["issues"].as_array().unwrap().len(), 0);

    // Endpoint unreachable: transport error surfaces as 502 and the
    // working copy stays editable for retry
    let (status, body) =
        request(&app, "POST", &format!("/splitsheet/{sheet}/submit"), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.unwrap()["error"], "submission_transport");

    let (status, _) = request(&app, "GET", &format!("/splitsheet/{sheet}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_audio_guard_rejects_non_audio() {
    use axum::body::Body;
    use axum::http::Request;

    let app = test_app();
    let sheet = create_sheet(&app).await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/splitsheet/{sheet}/audio"))
        .header("content-type", "image/png")
        .header("x-file-name", "cover.png")
        .body(Body::from(vec![0u8; 128]))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audio_attach_and_detach() {
    use axum::body::Body;
    use axum::http::Request;

    let app = test_app();
    let sheet = create_sheet(&app).await;

    let attach = Request::builder()
        .method("PUT")
        .uri(format!("/splitsheet/{sheet}/audio"))
        .header("content-type", "audio/mpeg")
        .header("x-file-name", "demo.mp3")
        .body(Body::from(vec![0u8; 1024]))
        .unwrap();
    let response = app.clone().oneshot(attach).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = request(&app, "DELETE", &format!("/splitsheet/{sheet}/audio"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_discard_session() {
    let app = test_app();
    let sheet = create_sheet(&app).await;
    let (status, _) = request(&app, "DELETE", &format!("/splitsheet/{sheet}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = request(&app, "GET", &format!("/splitsheet/{sheet}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
