//! Best-effort legacy envelope parser.
//!
//! Some agent builds reply with the Python `repr()` of their message, e.g.
//! `{'role': 'assistant', 'content': [{'text': '...'}]}`, instead of JSON.
//! This shim rewrites every `'` to `"` and retries as JSON. That is a
//! compatibility workaround, not JSON handling: text containing an
//! apostrophe or a double quote does not survive the rewrite, and such
//! inputs yield `None` so the caller keeps the original string.

use serde_json::Value;

/// Extract the human-readable text from a repr-style message literal.
///
/// - `content: [{text}, …]` → non-empty texts joined with `\n`, in order,
///   or `None` when none of them has text;
/// - without a `content` array, a non-empty top-level `text`;
/// - otherwise `None`.
pub fn parse_python_repr(raw: &str) -> Option<String> {
    let rewritten = raw.replace('\'', "\"");
    let inner: Value = serde_json::from_str(&rewritten).ok()?;

    if let Some(items) = inner.get("content").and_then(Value::as_array) {
        let joined = items
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        return (!joined.is_empty()).then_some(joined);
    }

    inner
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
