use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::service::{self, ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /chat (also /api/chat)
pub async fn chat(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let req: ChatRequest = super::parse_body(&body)
        .map_err(|e| AppError::bad_request(format!("invalid request body: {e}")))?;
    Ok(Json(service::chat(&app, req).await?))
}
