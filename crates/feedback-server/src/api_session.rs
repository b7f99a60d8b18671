//! Session provisioning proxy.

use crate::api::{ApiError, JsonOrForm};
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for `POST /session`. The body itself is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Handler for `POST /session`.
///
/// Relays the provider's JSON body and status code unmodified. Only a
/// failure to reach the provider (or a non-JSON reply) becomes a 500
/// envelope.
pub async fn create_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(request): JsonOrForm<CreateSessionRequest>,
) -> Result<Response, ApiError> {
    let relayed = state
        .provisioner
        .create_session(request.instructions.as_deref())
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(relayed.body)).into_response())
}
