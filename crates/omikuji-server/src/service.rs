//! Draw and chat orchestration: forward to the agent runtime, turn whatever
//! comes back into a reply, and fall back to local generation when needed.
//!
//! Both the HTTP routes and the CLI call into here.

use agent_runtime::{decode, Action, AgentInvoker, Invocation};
use omikuji_core::envelope::parse_envelope;
use omikuji_core::fallback::{self, DrawFallback};
use omikuji_core::prompt::{chat_prompt, DEFAULT_DRAW_PROMPT};
use omikuji_core::{ChatTurn, FortuneContext, FortuneRecord, SessionId};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub const NOT_CONFIGURED: &str = "agent runtime not configured";
pub const MISSING_MESSAGE: &str = "メッセージが必要です";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawRequest {
    pub prompt: Option<String>,
    pub session_id: Option<String>,
    pub actor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawResponse {
    pub result: String,
    pub fortune_data: FortuneRecord,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    #[serde(rename = "_fallback", skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(rename = "_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DrawResponse {
    fn local(session_id: SessionId, error: impl Into<String>) -> Self {
        let DrawFallback { message, record } = local_draw();
        Self {
            result: message,
            fortune_data: record,
            session_id,
            fallback: true,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub actor_id: Option<String>,
    #[serde(alias = "fortune_context")]
    pub fortune_context: Option<FortuneContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    pub timestamp: String,
    #[serde(rename = "_fallback", skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(rename = "_reason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    fn reply(session_id: SessionId, turn: ChatTurn) -> Self {
        Self {
            message: turn.content,
            session_id,
            timestamp: turn.timestamp,
            fallback: false,
            reason: None,
            error: None,
        }
    }

    fn unconfigured(session_id: SessionId) -> Self {
        Self {
            fallback: true,
            reason: Some(NOT_CONFIGURED.to_string()),
            ..Self::reply(session_id, ChatTurn::assistant(fallback::unconfigured_chat_message()))
        }
    }

    fn upstream_failure(session_id: SessionId, error: String) -> Self {
        Self {
            fallback: true,
            error: Some(error),
            ..Self::reply(session_id, ChatTurn::assistant(fallback::chat_message()))
        }
    }

    /// The reply as a conversation turn, for callers keeping a transcript.
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: omikuji_core::Role::Assistant,
            content: self.message.clone(),
            timestamp: self.timestamp.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// Draw a fortune. Never fails: any problem yields a complete local draw
/// tagged with `_fallback` and `_error`.
pub async fn draw(app: &AppState, req: DrawRequest) -> DrawResponse {
    let session_id = resolve_session(req.session_id, "draw");

    let Some(invoker) = app.invoker() else {
        tracing::warn!(session_id = %session_id, "{NOT_CONFIGURED}; drawing locally");
        return DrawResponse::local(session_id, NOT_CONFIGURED);
    };

    let invocation = Invocation {
        session_id: session_id.to_string(),
        actor_id: actor_id(app, req.actor_id),
        prompt: non_empty(req.prompt).unwrap_or_else(|| DEFAULT_DRAW_PROMPT.to_string()),
        action: Action::Draw,
    };
    tracing::info!(session_id = %session_id, actor_id = %invocation.actor_id, "invoking agent for draw");

    let body = match invoker.invoke(invocation).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "draw invocation failed; drawing locally");
            return DrawResponse::local(session_id, e.to_string());
        }
    };

    let envelope = parse_envelope(&decode(body).await);
    let record = match envelope.record {
        Some(record) => record,
        None => {
            tracing::debug!(session_id = %session_id, "agent reply had no fortune data; filling locally");
            local_draw().record
        }
    };
    let result = if envelope.message.trim().is_empty() {
        fallback::fortune_message(record.fortune.label()).to_string()
    } else {
        envelope.message
    };

    DrawResponse {
        result,
        fortune_data: record,
        session_id,
        fallback: false,
        error: None,
    }
}

/// Local draw for a request whose body could not be read at all.
pub fn draw_rejected(detail: impl Into<String>) -> DrawResponse {
    DrawResponse::local(new_session("draw"), detail)
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Answer one chat message.
///
/// Upstream failures still produce a 200-style reply tagged `_fallback`;
/// only a missing message or a failure on our side is an error.
pub async fn chat(app: &AppState, req: ChatRequest) -> Result<ChatResponse, AppError> {
    let Some(message) = non_empty(req.message) else {
        return Err(AppError::bad_request(MISSING_MESSAGE));
    };
    let session_id = resolve_session(req.session_id, "chat");

    let Some(invoker) = app.invoker() else {
        tracing::warn!(session_id = %session_id, "{NOT_CONFIGURED}; answering locally");
        return Ok(ChatResponse::unconfigured(session_id));
    };

    let invocation = Invocation {
        session_id: session_id.to_string(),
        actor_id: actor_id(app, req.actor_id),
        prompt: chat_prompt(&message, req.fortune_context.as_ref()),
        action: Action::Chat,
    };
    tracing::info!(
        session_id = %session_id,
        has_fortune_context = req.fortune_context.is_some(),
        "invoking agent for chat"
    );

    let body = match invoker.invoke(invocation).await {
        Ok(body) => body,
        Err(e) if e.is_upstream() => {
            tracing::warn!(session_id = %session_id, error = %e, "chat invocation failed; answering locally");
            return Ok(ChatResponse::upstream_failure(session_id, e.to_string()));
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "chat invocation could not be sent");
            return Err(AppError::chat_failure(&session_id, e.to_string()));
        }
    };

    let envelope = parse_envelope(&decode(body).await);
    let reply = if envelope.message.trim().is_empty() {
        fallback::chat_message().to_string()
    } else {
        envelope.message
    };

    Ok(ChatResponse::reply(session_id, ChatTurn::assistant(reply)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn local_draw() -> DrawFallback {
    fallback::draw(&mut rand::thread_rng())
}

fn resolve_session(requested: Option<String>, prefix: &str) -> SessionId {
    requested
        .and_then(SessionId::new)
        .unwrap_or_else(|| new_session(prefix))
}

/// `<prefix>-<uuid>`: 41+ characters, past the runtime's 33-character minimum.
fn new_session(prefix: &str) -> SessionId {
    SessionId::with_prefix(prefix, uuid::Uuid::new_v4())
}

fn actor_id(app: &AppState, requested: Option<String>) -> String {
    non_empty(requested).unwrap_or_else(|| app.config.runtime.actor_id.clone())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_runtime::{AgentRuntimeError, ResponseBody, StubInvoker, StubReply};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use futures::future::BoxFuture;
    use omikuji_core::config::Config;
    use omikuji_core::fallback::{fortune_message, LUCKY_COLORS};
    use omikuji_core::Fortune;
    use std::sync::Arc;

    fn stub_state(stub: &Arc<StubInvoker>) -> AppState {
        AppState::with_invoker(Config::default(), stub.clone())
    }

    fn unconfigured() -> AppState {
        AppState::new(Config::default()).unwrap()
    }

    /// Fails before anything reaches the network.
    struct BrokenInvoker;

    impl AgentInvoker for BrokenInvoker {
        fn invoke(
            &self,
            _invocation: Invocation,
        ) -> BoxFuture<'_, agent_runtime::Result<ResponseBody>> {
            Box::pin(async { Err(AgentRuntimeError::InvalidTarget("no route".into())) })
        }
    }

    // --- draw ---

    #[tokio::test]
    async fn draw_uses_agent_message_and_record() {
        let stub = Arc::new(StubInvoker::text(
            r#"{"result":"やったね！","fortune_data":{"fortune":"中吉","lucky_color":"赤","lucky_item":"鍵","lucky_spot":"海"}}"#,
        ));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;
        assert_eq!(out.result, "やったね！");
        assert_eq!(out.fortune_data.fortune, Fortune::Chukichi);
        assert_eq!(out.fortune_data.lucky_color, "赤");
        assert!(!out.fallback);
        assert!(out.error.is_none());
    }

    #[tokio::test]
    async fn draw_sends_defaults_when_request_is_empty() {
        let stub = Arc::new(StubInvoker::text("hi"));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, DEFAULT_DRAW_PROMPT);
        assert_eq!(calls[0].actor_id, "web_user");
        assert_eq!(calls[0].action, Action::Draw);
        assert_eq!(calls[0].session_id, out.session_id.as_str());
        assert!(out.session_id.as_str().starts_with("draw-"));
        assert!(out.session_id.as_str().len() >= 33);
    }

    #[tokio::test]
    async fn draw_forwards_caller_fields() {
        let stub = Arc::new(StubInvoker::text("hi"));
        let req = DrawRequest {
            prompt: Some("恋愛運を占って".into()),
            session_id: Some("session-from-client".into()),
            actor_id: Some("user-7".into()),
        };
        let out = draw(&stub_state(&stub), req).await;
        let call = &stub.calls()[0];
        assert_eq!(call.prompt, "恋愛運を占って");
        assert_eq!(call.actor_id, "user-7");
        assert_eq!(out.session_id.as_str(), "session-from-client");
    }

    #[tokio::test]
    async fn draw_without_record_keeps_agent_message() {
        let stub = Arc::new(StubInvoker::text("今日はいい日！"));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;
        assert_eq!(out.result, "今日はいい日！");
        assert!(LUCKY_COLORS.contains(&out.fortune_data.lucky_color.as_str()));
        assert!(!out.fallback);
    }

    #[tokio::test]
    async fn draw_with_blank_message_uses_template_for_label() {
        let stub = Arc::new(StubInvoker::text(
            r#"{"result":"  ","fortune_data":{"fortune":"凶"}}"#,
        ));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;
        assert_eq!(out.fortune_data.fortune, Fortune::Kyo);
        assert_eq!(out.result, fortune_message("凶"));
    }

    #[tokio::test]
    async fn draw_with_empty_reply_is_still_complete() {
        let stub = Arc::new(StubInvoker::new(StubReply::Chunks(Vec::new())));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;
        assert_eq!(out.result, fortune_message(out.fortune_data.fortune.label()));
    }

    #[tokio::test]
    async fn draw_upstream_failure_falls_back() {
        let stub = Arc::new(StubInvoker::failing(502, "bad gateway"));
        let out = draw(&stub_state(&stub), DrawRequest::default()).await;
        assert!(out.fallback);
        assert!(out.error.unwrap().contains("502"));
        assert_eq!(out.result, fortune_message(out.fortune_data.fortune.label()));
    }

    #[tokio::test]
    async fn draw_unconfigured_falls_back_without_invoking() {
        let req = DrawRequest {
            session_id: Some("keep-me".into()),
            ..DrawRequest::default()
        };
        let out = draw(&unconfigured(), req).await;
        assert!(out.fallback);
        assert_eq!(out.error.as_deref(), Some(NOT_CONFIGURED));
        assert_eq!(out.session_id.as_str(), "keep-me");
    }

    #[test]
    fn draw_response_serializes_wire_names() {
        let out = draw_rejected("bad body");
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["result"].is_string());
        assert!(json["fortune_data"]["starRating"].is_string());
        assert!(json["sessionId"].as_str().unwrap().starts_with("draw-"));
        assert_eq!(json["_fallback"], true);
        assert_eq!(json["_error"], "bad body");
    }

    // --- chat ---

    #[tokio::test]
    async fn chat_requires_a_message() {
        let stub = Arc::new(StubInvoker::text("hi"));
        for message in [None, Some(String::new())] {
            let req = ChatRequest {
                message,
                ..ChatRequest::default()
            };
            let err = chat(&stub_state(&stub), req).await.unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn chat_accepts_whitespace_message_and_session() {
        let stub = Arc::new(StubInvoker::text("うん！"));
        let req = ChatRequest {
            message: Some("  ".into()),
            session_id: Some(" ".into()),
            ..ChatRequest::default()
        };
        let out = chat(&stub_state(&stub), req).await.unwrap();
        assert_eq!(out.message, "うん！");
        assert_eq!(out.session_id.as_str(), " ");

        let call = &stub.calls()[0];
        assert_eq!(call.prompt, "  ");
        assert_eq!(call.session_id, " ");
    }

    #[tokio::test]
    async fn chat_forwards_context_prompt() {
        let stub = Arc::new(StubInvoker::text(r#"{"result":"ピンクが最高！"}"#));
        let ctx = FortuneContext {
            fortune: "大吉".into(),
            lucky_color: "ピンク".into(),
            lucky_item: "リップグロス".into(),
            lucky_spot: "カフェ".into(),
        };
        let req = ChatRequest {
            message: Some("ラッキーカラーについて教えて".into()),
            session_id: Some("draw-session".into()),
            fortune_context: Some(ctx.clone()),
            ..ChatRequest::default()
        };
        let out = chat(&stub_state(&stub), req).await.unwrap();
        assert_eq!(out.message, "ピンクが最高！");
        assert_eq!(out.session_id.as_str(), "draw-session");

        let call = &stub.calls()[0];
        assert_eq!(call.action, Action::Chat);
        assert_eq!(
            call.prompt,
            chat_prompt("ラッキーカラーについて教えて", Some(&ctx))
        );
    }

    #[tokio::test]
    async fn chat_blank_reply_uses_retry_message() {
        let stub = Arc::new(StubInvoker::text(r#"{"result":""}"#));
        let req = ChatRequest {
            message: Some("こんにちは".into()),
            ..ChatRequest::default()
        };
        let out = chat(&stub_state(&stub), req).await.unwrap();
        assert_eq!(out.message, fallback::chat_message());
        assert!(out.session_id.as_str().starts_with("chat-"));
    }

    #[tokio::test]
    async fn chat_unconfigured_reports_reason() {
        let req = ChatRequest {
            message: Some("こんにちは".into()),
            ..ChatRequest::default()
        };
        let out = chat(&unconfigured(), req).await.unwrap();
        assert_eq!(out.message, fallback::unconfigured_chat_message());
        assert!(out.fallback);
        assert_eq!(out.reason.as_deref(), Some(NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn chat_upstream_failure_is_a_tagged_reply() {
        let stub = Arc::new(StubInvoker::failing(500, "runtime exploded"));
        let req = ChatRequest {
            message: Some("こんにちは".into()),
            ..ChatRequest::default()
        };
        let out = chat(&stub_state(&stub), req).await.unwrap();
        assert_eq!(out.message, fallback::chat_message());
        assert!(out.fallback);
        assert!(out.error.unwrap().contains("runtime exploded"));
    }

    #[tokio::test]
    async fn chat_internal_failure_is_a_500() {
        let state = AppState::with_invoker(Config::default(), Arc::new(BrokenInvoker));
        let req = ChatRequest {
            message: Some("こんにちは".into()),
            ..ChatRequest::default()
        };
        let err = chat(&state, req).await.unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn chat_response_turn_keeps_timestamp() {
        let out = ChatResponse::reply(
            SessionId::new("s").unwrap(),
            ChatTurn::assistant("やほー"),
        );
        let turn = out.to_turn();
        assert_eq!(turn.content, "やほー");
        assert_eq!(turn.timestamp, out.timestamp);
    }
}
