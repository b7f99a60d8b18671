//! Shared setup for router integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use feedback_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use feedback_server::{app, AppState};
use feedback_session::{ProviderConfig, SessionProvisioner};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Nothing listens on the discard port, so session calls fail fast.
pub const UNREACHABLE_PROVIDER: &str = "http://127.0.0.1:9/v1/realtime/sessions";

pub struct TestApp {
    pub app: Router,
    pub pool: DbPool,
    // Keeps the database file alive for the test's duration.
    _db: NamedTempFile,
}

pub fn setup_app() -> TestApp {
    setup_app_with_provider(UNREACHABLE_PROVIDER)
}

pub fn setup_app_with_provider(session_url: &str) -> TestApp {
    let db = NamedTempFile::new().unwrap();
    let pool = create_pool(db.path().to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    let provisioner =
        SessionProvisioner::new(ProviderConfig::new("sk-test").with_session_url(session_url))
            .unwrap();

    TestApp {
        app: app(AppState::new(pool.clone(), provisioner)),
        pool,
        _db: db,
    }
}

/// Sends one request and returns the status with the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Sends a `application/x-www-form-urlencoded` POST, as an HTML form would.
pub async fn send_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn create_agent(app: &Router, instructions: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/create-agent",
        Some(serde_json::json!({ "instructions": instructions })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

pub async fn create_conversation(app: &Router, agent_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/conversation",
        Some(serde_json::json!({ "agentId": agent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["conversationId"].as_str().unwrap().to_string()
}

/// Request bodies received by a mock provider.
pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Starts a stand-in session provider that records each body and answers
/// with `status` and `reply`.
pub async fn spawn_provider(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = Router::new().route(
        "/v1/realtime/sessions",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            let reply = reply.clone();
            async move {
                sink.lock().unwrap().push(body);
                (status, Json(reply))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/realtime/sessions", addr), captured)
}
