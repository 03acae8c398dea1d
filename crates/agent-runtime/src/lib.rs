//! `agent-runtime`: binding for a hosted agent runtime's invocation API.
//!
//! # Architecture
//!
//! ```text
//! Invocation
//!     │
//!     ▼
//! AgentInvoker    ← HttpInvoker (POST …/invocations) or StubInvoker
//!     │
//!     ▼
//! ResponseBody    ← tagged union of every reply shape (text, bytes,
//!     │              deferred text, blob, chunk stream, empty)
//!     ▼
//! decode()        ← one UTF-8 string, never an error
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use agent_runtime::{decode, Action, AgentInvoker, HttpInvoker, Invocation, RuntimeTarget};
//! use std::time::Duration;
//!
//! let invoker = HttpInvoker::new(
//!     &RuntimeTarget::Endpoint("http://localhost:8080".into()),
//!     Duration::from_secs(60),
//!     None,
//! )?;
//! let body = invoker
//!     .invoke(Invocation {
//!         session_id: "draw-0b9f…".into(),
//!         actor_id: "web_user".into(),
//!         prompt: "おみくじを引いてください".into(),
//!         action: Action::Draw,
//!     })
//!     .await?;
//! println!("{}", decode(body).await);
//! ```

pub mod body;
pub mod decode;
pub mod error;
pub mod http;
pub mod invoker;
pub mod stub;
pub mod types;

pub use body::{ChunkStream, ResponseBody, TextFuture};
pub use decode::decode;
pub use error::AgentRuntimeError;
pub use http::{HttpInvoker, RuntimeTarget, SESSION_HEADER};
pub use invoker::AgentInvoker;
pub use stub::{StubInvoker, StubReply};
pub use types::{Action, Invocation, InvocationPayload};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AgentRuntimeError>;
