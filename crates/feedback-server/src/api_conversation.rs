//! Conversation transcript handlers.

use crate::api::{acknowledged, required, success, with_conn, ApiError, Envelope, JsonOrForm};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use feedback_types::{Conversation, Speaker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body for conversation creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(rename = "agentId", default)]
    pub agent_id: Option<String>,
}

/// Response body for conversation creation.
#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

/// Request body for appending a transcript message.
#[derive(Debug, Default, Deserialize)]
pub struct AppendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
    /// `"agent"` or `"user"`.
    #[serde(default)]
    pub speaker: Option<String>,
}

/// Handler for `POST /conversation`.
pub async fn create_conversation_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(payload): JsonOrForm<CreateConversationRequest>,
) -> Result<(StatusCode, Json<Envelope<CreateConversationResponse>>), ApiError> {
    let agent_id = payload.agent_id.unwrap_or_default();

    let conversation = with_conn(&state, move |conn| {
        feedback_store::create_conversation(conn, &agent_id)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        success(CreateConversationResponse {
            conversation_id: conversation.conversation_id,
        }),
    ))
}

/// Handler for `POST /conversation/{conversationId}/message`.
pub async fn append_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    JsonOrForm(payload): JsonOrForm<AppendMessageRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let content = required("content", payload.content)?;
    let speaker: Speaker = required("speaker", payload.speaker)?
        .parse()
        .map_err(|e: feedback_types::ParseSpeakerError| ApiError::BadRequest(e.to_string()))?;

    with_conn(&state, move |conn| {
        feedback_store::append_message(conn, &conversation_id, &content, speaker)
    })
    .await?;

    Ok(acknowledged())
}

/// Handler for `GET /conversation/{conversationId}`.
pub async fn get_conversation_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Envelope<Conversation>>, ApiError> {
    let conversation = with_conn(&state, move |conn| {
        feedback_store::get_conversation(conn, &conversation_id)
    })
    .await?;
    Ok(success(conversation))
}
