pub mod chat;
pub mod draw;
pub mod health;

use serde::de::DeserializeOwned;

/// Parse a JSON request body regardless of content type. An empty body is
/// the default request.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> serde_json::Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
}
