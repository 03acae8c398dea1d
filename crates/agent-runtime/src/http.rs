use std::time::Duration;

use futures::future::BoxFuture;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::body::ResponseBody;
use crate::invoker::AgentInvoker;
use crate::types::Invocation;
use crate::{AgentRuntimeError, Result};

/// Header the runtime uses to route a call to the session's microVM/memory.
pub const SESSION_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";

// ─── RuntimeTarget ────────────────────────────────────────────────────────

/// Where invocations are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeTarget {
    /// A self-hosted or local runtime; calls go to `<base>/invocations`.
    Endpoint(String),
    /// The managed runtime, addressed by ARN in a region.
    Hosted {
        arn: String,
        region: String,
        qualifier: String,
    },
}

impl RuntimeTarget {
    pub fn invocation_url(&self) -> Result<Url> {
        match self {
            RuntimeTarget::Endpoint(base) => {
                let mut url = Url::parse(base)
                    .map_err(|e| AgentRuntimeError::InvalidTarget(format!("{base}: {e}")))?;
                url.path_segments_mut()
                    .map_err(|_| {
                        AgentRuntimeError::InvalidTarget(format!("{base}: cannot be a base URL"))
                    })?
                    .pop_if_empty()
                    .push("invocations");
                Ok(url)
            }
            RuntimeTarget::Hosted {
                arn,
                region,
                qualifier,
            } => {
                if arn.trim().is_empty() {
                    return Err(AgentRuntimeError::InvalidTarget("empty runtime ARN".into()));
                }
                // The ARN travels as a single path segment, so ':' and '/' must be escaped.
                let escaped: String = url::form_urlencoded::byte_serialize(arn.as_bytes()).collect();
                let raw = format!(
                    "https://bedrock-agentcore.{region}.amazonaws.com/runtimes/{escaped}/invocations"
                );
                let mut url = Url::parse(&raw)
                    .map_err(|e| AgentRuntimeError::InvalidTarget(format!("{raw}: {e}")))?;
                url.query_pairs_mut().append_pair("qualifier", qualifier);
                Ok(url)
            }
        }
    }
}

// ─── HttpInvoker ──────────────────────────────────────────────────────────

/// [`AgentInvoker`] speaking the runtime's HTTP invocation API.
///
/// The reply body is handed back unread as [`ResponseBody::Chunks`]; the
/// client timeout bounds both the call and draining the stream.
pub struct HttpInvoker {
    client: reqwest::Client,
    url: Url,
    bearer_token: Option<String>,
}

impl HttpInvoker {
    pub fn new(
        target: &RuntimeTarget,
        timeout: Duration,
        bearer_token: Option<String>,
    ) -> Result<Self> {
        let url = target.invocation_url()?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            bearer_token,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn send(&self, invocation: Invocation) -> Result<ResponseBody> {
        let payload = serde_json::to_vec(&invocation.payload())?;

        tracing::info!(
            url = %self.url,
            session_id = %invocation.session_id,
            actor_id = %invocation.actor_id,
            action = invocation.action.as_str(),
            "invoking agent runtime"
        );

        let mut req = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(SESSION_HEADER, invocation.session_id.as_str())
            .body(payload);
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgentRuntimeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));
        Ok(ResponseBody::Chunks(Box::pin(stream)))
    }
}

impl AgentInvoker for HttpInvoker {
    fn invoke(&self, invocation: Invocation) -> BoxFuture<'_, Result<ResponseBody>> {
        Box::pin(self.send(invocation))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
