use axum::extract::State;
use axum::Json;
use omikuji_core::now_timestamp;

use crate::state::AppState;

/// GET /health (also /api/health)
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": now_timestamp(),
        "configured": app.is_configured(),
    }))
}
