pub mod error;
pub mod routes;
pub mod service;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Draw, chat and health routes (each also under `/api`), wrapped in CORS,
/// request tracing and a panic guard that answers with the chat apology.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health))
        .route("/api/health", get(routes::health::health))
        // Draw
        .route("/draw", post(routes::draw::draw))
        .route("/api/omikuji", post(routes::draw::draw))
        // Chat
        .route("/chat", post(routes::chat::chat))
        .route("/api/chat", post(routes::chat::chat))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the omikuji API server on `bind:port`.
pub async fn serve(app_state: AppState, bind: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    serve_on(app_state, listener).await
}

/// Start the omikuji API server on a pre-bound listener.
///
/// The caller can read the actual port before starting, which matters when
/// `port = 0` and the OS picks one.
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let configured = app_state.is_configured();
    let app = build_router(app_state);

    tracing::info!(%addr, configured, "omikuji API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
