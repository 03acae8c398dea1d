use std::fmt;
use std::io;

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::BoxStream;

/// Deferred "read everything as text" operation.
pub type TextFuture = BoxFuture<'static, io::Result<String>>;

/// Asynchronous sequence of byte chunks, yielded in arrival order.
pub type ChunkStream = BoxStream<'static, io::Result<Bytes>>;

// ─── ResponseBody ─────────────────────────────────────────────────────────

/// Every shape an agent runtime reply body can arrive in.
///
/// The invoker picks the variant when it receives the reply; downstream code
/// never inspects raw SDK values. Feed it to [`crate::decode`] to get text.
pub enum ResponseBody {
    /// Already-decoded text.
    Text(String),
    /// A complete byte buffer.
    Bytes(Bytes),
    /// SDK stream wrapper exposing "transform to string".
    Transform(TextFuture),
    /// Blob exposing "read as text".
    Blob(TextFuture),
    /// Streaming body; chunks must be concatenated before decoding.
    Chunks(ChunkStream),
    /// No body, or a body of an unrecognized shape.
    Empty,
}

impl ResponseBody {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn bytes(b: impl Into<Bytes>) -> Self {
        Self::Bytes(b.into())
    }

    /// Wrap an in-memory list of chunks as a streaming body.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Bytes>,
    {
        let items: Vec<io::Result<Bytes>> = chunks.into_iter().map(|c| Ok(c.into())).collect();
        Self::Chunks(Box::pin(futures::stream::iter(items)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Transform(_) => "transform",
            Self::Blob(_) => "blob",
            Self::Chunks(_) => "chunks",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(b))
    }
}
