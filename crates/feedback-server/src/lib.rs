//! HTTP surface of the voice feedback backend.
//!
//! Routes map one-to-one onto store operations or the session provisioner.
//! Dependencies (the SQLite pool and the provisioner with its HTTP client) are
//! built once in `main`, carried in [`AppState`], and dropped at shutdown.

pub mod api;
pub mod api_agent;
pub mod api_conversation;
pub mod api_session;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use feedback_db::DbPool;
use feedback_session::SessionProvisioner;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Real-time session provisioner.
    pub provisioner: Arc<SessionProvisioner>,
}

impl AppState {
    pub fn new(pool: DbPool, provisioner: SessionProvisioner) -> Self {
        Self {
            pool,
            provisioner: Arc::new(provisioner),
        }
    }
}

/// Maximum request body size (1 MiB). Transcript messages are short text.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Voice Feedback API is running"
    }))
}

async fn route_not_found() -> api::ApiError {
    api::ApiError::NotFound("route not found".to_string())
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/session", post(api_session::create_session_handler))
        .route("/create-agent", post(api_agent::create_agent_handler))
        .route("/agent/{id}", get(api_agent::get_agent_handler))
        .route(
            "/agent/{id}/conversations",
            get(api_agent::list_agent_conversations_handler),
        )
        .route(
            "/conversation",
            post(api_conversation::create_conversation_handler),
        )
        .route(
            "/conversation/{conversationId}",
            get(api_conversation::get_conversation_handler),
        )
        .route(
            "/conversation/{conversationId}/message",
            post(api_conversation::append_message_handler),
        )
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
