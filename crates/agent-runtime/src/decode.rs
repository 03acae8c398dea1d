use futures::StreamExt;

use crate::body::{ChunkStream, ResponseBody};

/// Normalize any [`ResponseBody`] into one UTF-8 string.
///
/// Never fails: invalid UTF-8 is replaced with U+FFFD, and read errors
/// degrade to whatever text was available (an empty string at worst), so
/// callers can always proceed to envelope parsing or the fallback path.
pub async fn decode(body: ResponseBody) -> String {
    match body {
        ResponseBody::Text(s) => s,
        ResponseBody::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
        ResponseBody::Transform(read) | ResponseBody::Blob(read) => match read.await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read agent response body");
                String::new()
            }
        },
        ResponseBody::Chunks(stream) => {
            let buf = drain(stream).await;
            String::from_utf8_lossy(&buf).into_owned()
        }
        ResponseBody::Empty => String::new(),
    }
}

/// Concatenate every chunk in arrival order. Decoding happens once over the
/// whole buffer so characters split across chunk boundaries survive.
async fn drain(mut stream: ChunkStream) -> Vec<u8> {
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => buf.extend_from_slice(&bytes),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    received = buf.len(),
                    "agent response stream failed; keeping bytes received so far"
                );
                break;
            }
        }
    }
    buf
}

// ─── Tests ────────────────────────────────────────────────────────────────
