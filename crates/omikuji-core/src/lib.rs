pub mod config;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod prompt;
pub mod types;

pub use error::{OmikujiError, Result};
pub use types::{now_timestamp, ChatTurn, Fortune, FortuneContext, FortuneRecord, Role, SessionId};
