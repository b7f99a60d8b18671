//! Agent API handlers.

use crate::api::{success, with_conn, ApiError, Envelope, JsonOrForm};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use feedback_types::{Agent, Conversation};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for agent creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAgentRequest {
    /// Persona text. Absence is reported as a validation error, not a
    /// deserialization error.
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Handler for `POST /create-agent`.
pub async fn create_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(payload): JsonOrForm<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Envelope<Agent>>), ApiError> {
    let instructions = payload.instructions.unwrap_or_default();

    let agent = with_conn(&state, move |conn| {
        feedback_store::create_agent(conn, &instructions)
    })
    .await?;

    Ok((StatusCode::CREATED, success(agent)))
}

/// Handler for `GET /agent/{id}`.
pub async fn get_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Agent>>, ApiError> {
    let agent = with_conn(&state, move |conn| feedback_store::get_agent(conn, &id)).await?;
    Ok(success(agent))
}

/// Handler for `GET /agent/{agentId}/conversations`.
///
/// Most recently started first. An unknown agent lists as empty.
pub async fn list_agent_conversations_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Result<Json<Envelope<Vec<Conversation>>>, ApiError> {
    let conversations = with_conn(&state, move |conn| {
        feedback_store::list_conversations_for_agent(conn, &agent_id)
    })
    .await?;
    Ok(success(conversations))
}
