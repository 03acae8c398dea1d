use std::sync::Mutex;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::body::ResponseBody;
use crate::invoker::AgentInvoker;
use crate::types::Invocation;
use crate::{AgentRuntimeError, Result};

/// Canned reply for [`StubInvoker`].
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Reply with this text, delivered as a single-chunk stream.
    Text(String),
    /// Reply with these chunks, in order.
    Chunks(Vec<Bytes>),
    /// Fail as if the runtime answered with this status and body.
    Fail { status: u16, body: String },
}

/// In-memory [`AgentInvoker`] that answers every call with the same
/// [`StubReply`] and records what it was asked.
///
/// Used by the server tests.
pub struct StubInvoker {
    reply: StubReply,
    calls: Mutex<Vec<Invocation>>,
}

impl StubInvoker {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(StubReply::Text(s.into()))
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::new(StubReply::Fail {
            status,
            body: body.into(),
        })
    }

    /// Every invocation received so far, oldest first.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn reply(&self) -> Result<ResponseBody> {
        match &self.reply {
            StubReply::Text(s) => Ok(ResponseBody::from_chunks(vec![s.clone()])),
            StubReply::Chunks(chunks) => Ok(ResponseBody::from_chunks(chunks.clone())),
            StubReply::Fail { status, body } => Err(AgentRuntimeError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

impl AgentInvoker for StubInvoker {
    fn invoke(&self, invocation: Invocation) -> BoxFuture<'_, Result<ResponseBody>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation);
        }
        let reply = self.reply();
        Box::pin(async move { reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use crate::types::Action;

    fn invocation(prompt: &str) -> Invocation {
        Invocation {
            session_id: "s1".into(),
            actor_id: "web_user".into(),
            prompt: prompt.into(),
            action: Action::Chat,
        }
    }

    #[tokio::test]
    async fn records_calls_and_replies_with_text() {
        let stub = StubInvoker::text(r#"{"result":"hello"}"#);
        let body = stub.invoke(invocation("hi")).await.unwrap();
        assert_eq!(decode(body).await, r#"{"result":"hello"}"#);

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "hi");
    }

    #[tokio::test]
    async fn failing_stub_returns_upstream_error() {
        let stub = StubInvoker::failing(500, "Connection failed");
        let err = stub.invoke(invocation("hi")).await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(stub.calls().len(), 1);
    }
}
