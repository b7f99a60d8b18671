//! Response envelope, error mapping, and shared handler plumbing.

use crate::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use feedback_store::StoreError;
use rusqlite::Connection;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Message returned to callers for any 500. Details go to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The `{status, data}` wrapper returned by every non-proxy endpoint on
/// success. `data` is omitted for plain acknowledgements.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Wraps `data` in a success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        status: "success".to_string(),
        data: Some(data),
    })
}

/// A success envelope with no payload.
pub fn acknowledged() -> Json<Envelope<()>> {
    Json(Envelope {
        status: "success".to_string(),
        data: None,
    })
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "rejecting invalid request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(error = %msg, "requested document not found");
                (StatusCode::NOT_FOUND, msg)
            }
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::BadRequest(msg),
            StoreError::AgentNotFound(_) | StoreError::ConversationNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            StoreError::Database(_) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Request body accepted as `application/x-www-form-urlencoded` or JSON.
///
/// Form bodies are selected by `Content-Type`. Anything else is parsed as
/// JSON, and an empty or whitespace-only body yields `T::default()` so the
/// handler can report missing fields itself. All failures are 400 envelopes.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        let body = Bytes::from_request(req, state).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        let Json(value) = Json::<T>::from_bytes(&body)?;
        Ok(Self(value))
    }
}

/// Runs one store operation on a pooled connection off the async runtime.
pub(crate) async fn with_conn<T, F>(state: &Arc<AppState>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;
        op(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))?
}

/// Returns a required string field, rejecting absent or blank values.
pub(crate) fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("{field} is required"))),
    }
}
