use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use omikuji_core::fallback::error_chat_message;
use omikuji_core::now_timestamp;
use omikuji_core::SessionId;

// ---------------------------------------------------------------------------
// Internal sentinels
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// A failure on our side of a chat request. The session is echoed back so
/// the client can keep the conversation going.
#[derive(Debug)]
struct ChatFailure {
    session_id: SessionId,
    detail: String,
}

impl std::fmt::Display for ChatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chat failed for session {}: {}", self.session_id, self.detail)
    }
}

impl std::error::Error for ChatFailure {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// 400s carry `{error}`. Everything else becomes a 500 with the user-facing
/// apology in `message` and the internal detail in `_error`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub fn chat_failure(session_id: &SessionId, detail: impl Into<String>) -> Self {
        Self(
            ChatFailure {
                session_id: session_id.clone(),
                detail: detail.into(),
            }
            .into(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        if let Some(c) = self.0.downcast_ref::<ChatFailure>() {
            let body = serde_json::json!({
                "message": error_chat_message(),
                "sessionId": c.session_id,
                "timestamp": now_timestamp(),
                "_error": c.detail.clone(),
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        }

        tracing::error!(error = %format!("{:#}", self.0), "request failed");
        internal_error(self.0.to_string())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Response for a handler that panicked. Installed via `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    internal_error(detail)
}

fn internal_error(detail: String) -> Response {
    let body = serde_json::json!({
        "message": error_chat_message(),
        "timestamp": now_timestamp(),
        "_error": detail,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
