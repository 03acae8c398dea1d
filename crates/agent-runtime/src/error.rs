use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentRuntimeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("agent runtime returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid runtime target: {0}")]
    InvalidTarget(String),

    #[error("failed to encode invocation payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AgentRuntimeError {
    /// `true` when the failure happened on the far side of the wire
    /// (transport error or a non-2xx reply), as opposed to a local fault
    /// while preparing the request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}
