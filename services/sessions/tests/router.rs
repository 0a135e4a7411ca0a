//! End-to-end tests through the full router and CORS middleware

use reqwest::{Client, Method, StatusCode, header};
use serde_json::{Value, json};
use sessions::{middleware::CorsPolicy, routes::create_router, state::AppState};
use tokio::net::TcpListener;

/// Serve a fresh in-memory app on an ephemeral port
async fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().unwrap();
    let app = create_router(AppState::in_memory(CorsPolicy::default()));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", address)
}

#[tokio::test]
async fn test_session_lifecycle() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/sessions"))
        .json(&json!({ "durationMinutes": 25, "title": "Chemistry" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let response = client
        .patch(format!("{base}/sessions/{id}"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Chemistry");

    let listed: Value = client
        .get(format!("{base}/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([updated]));

    let response = client
        .delete(format!("{base}/sessions/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{base}/sessions/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_body_is_bad_request() {
    let base = spawn_app().await;

    let response = Client::new()
        .post(format!("{base}/sessions"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_ok() {
    let base = spawn_app().await;

    let response = Client::new()
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_allowed_origin_gets_headers() {
    let base = spawn_app().await;

    let response = Client::new()
        .get(format!("{base}/sessions"))
        .header(header::ORIGIN, "https://focus-session-tracker.netlify.app")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://focus-session-tracker.netlify.app"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let base = spawn_app().await;

    let response = Client::new()
        .request(Method::OPTIONS, format!("{base}/sessions/abc"))
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PATCH, DELETE, OPTIONS"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let base = spawn_app().await;

    let response = Client::new()
        .post(format!("{base}/sessions"))
        .header(header::ORIGIN, "https://evil.example.com")
        .json(&json!({ "durationMinutes": 25 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not allowed by CORS");
}

#[tokio::test]
async fn test_cors_rejects_dev_origin_lookalike() {
    let base = spawn_app().await;

    let response = Client::new()
        .get(format!("{base}/sessions"))
        .header(header::ORIGIN, "http://localhost:5173.evil.com")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_requests_without_origin_pass() {
    let base = spawn_app().await;

    let response = Client::new().get(&base).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
