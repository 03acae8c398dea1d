use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::service::{self, DrawRequest, DrawResponse};
use crate::state::AppState;

/// POST /draw (also /api/omikuji). Always answers 200 with a complete draw.
pub async fn draw(State(app): State<AppState>, body: Bytes) -> Json<DrawResponse> {
    match super::parse_body::<DrawRequest>(&body) {
        Ok(req) => Json(service::draw(&app, req).await),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable draw request; drawing locally");
            Json(service::draw_rejected(format!("invalid request body: {e}")))
        }
    }
}
