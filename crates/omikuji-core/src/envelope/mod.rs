//! Extracts a human-readable message, and optionally a fortune record, from
//! decoded agent replies whose JSON shape drifts between agent versions.
//!
//! Nothing here fails: every parse error degrades to a less structured
//! result, down to the decoded text itself.

pub mod legacy;

use serde_json::{Map, Value};

use crate::types::{now_timestamp, Fortune, FortuneRecord};

/// Top-level fields that may carry the message, in priority order.
const MESSAGE_FIELDS: [&str; 3] = ["result", "text", "message"];

/// Top-level fields that may carry structured fortune data.
const RECORD_FIELDS: [&str; 2] = ["fortune_data", "fortuneData"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub message: String,
    pub record: Option<FortuneRecord>,
}

/// Parse decoded reply text into an [`Envelope`].
pub fn parse_envelope(text: &str) -> Envelope {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => {
            return Envelope {
                message: text.to_string(),
                record: None,
            }
        }
    };

    // With no message field the whole reply is the selected string, so it
    // gets the legacy pass too. A non-string field is shown raw.
    let message = match select_message(&parsed) {
        Some(Value::String(selected)) => {
            legacy::parse_python_repr(selected).unwrap_or_else(|| selected.clone())
        }
        Some(_) => text.to_string(),
        None => legacy::parse_python_repr(text).unwrap_or_else(|| text.to_string()),
    };

    let record = parsed
        .as_object()
        .and_then(|obj| {
            RECORD_FIELDS
                .iter()
                .find_map(|field| obj.get(*field).and_then(Value::as_object))
        })
        .and_then(normalize_fortune_data);

    tracing::debug!(
        message_len = message.len(),
        has_record = record.is_some(),
        "parsed agent envelope"
    );

    Envelope { message, record }
}

/// Normalize an upstream `fortune_data` object into a [`FortuneRecord`].
///
/// Lucky attributes accept snake_case or camelCase (first non-empty wins,
/// default `""`); `timestamp` defaults to now. The star rating is always
/// recomputed from the label. Returns `None` when the label is missing or
/// not one of the six known outcomes.
pub fn normalize_fortune_data(data: &Map<String, Value>) -> Option<FortuneRecord> {
    let Some(label) = data.get("fortune").and_then(Value::as_str) else {
        tracing::warn!("fortune_data has no fortune label; ignoring it");
        return None;
    };
    let fortune: Fortune = match label.parse() {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring fortune_data");
            return None;
        }
    };

    let timestamp = first_non_empty(data, &["timestamp"]).unwrap_or_else(now_timestamp);

    Some(FortuneRecord::new(
        fortune,
        first_non_empty(data, &["lucky_color", "luckyColor"]).unwrap_or_default(),
        first_non_empty(data, &["lucky_item", "luckyItem"]).unwrap_or_default(),
        first_non_empty(data, &["lucky_spot", "luckySpot"]).unwrap_or_default(),
        timestamp,
    ))
}

fn select_message(parsed: &Value) -> Option<&Value> {
    let obj = parsed.as_object()?;
    MESSAGE_FIELDS
        .iter()
        .find_map(|field| obj.get(*field).filter(|v| is_truthy(v)))
}

/// A field only counts as present when it carries something.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_non_empty(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_json_text_is_the_message() {
        for text in ["hello", "", "{not json", "大吉だよ！"] {
            let env = parse_envelope(text);
            assert_eq!(env.message, text);
            assert_eq!(env.record, None);
        }
    }

    #[test]
    fn result_field_is_the_message() {
        let env = parse_envelope(r#"{"result":"hello"}"#);
        assert_eq!(env.message, "hello");
        assert_eq!(env.record, None);
    }

    #[test]
    fn fields_are_tried_in_order_skipping_empty_ones() {
        let env = parse_envelope(r#"{"result":"","text":"from text","message":"from message"}"#);
        assert_eq!(env.message, "from text");

        let env = parse_envelope(r#"{"message":"from message"}"#);
        assert_eq!(env.message, "from message");
    }

    #[test]
    fn missing_fields_fall_back_to_raw_text() {
        let raw = r#"{"status":"ok"}"#;
        assert_eq!(parse_envelope(raw).message, raw);

        let raw = r#"["a","b"]"#;
        assert_eq!(parse_envelope(raw).message, raw);

        let raw = "null";
        assert_eq!(parse_envelope(raw).message, raw);
    }

    #[test]
    fn bare_content_reply_is_unwrapped() {
        let raw = r#"{"role":"assistant","content":[{"text":"A"},{"text":"B"}]}"#;
        assert_eq!(parse_envelope(raw).message, "A\nB");

        let raw = "{'role': 'assistant', 'content': [{'text': '中吉だよ'}]}";
        // Not JSON before the rewrite, so it stays as-is.
        assert_eq!(parse_envelope(raw).message, raw);

        let raw = r#"{"text":"こんにちは","fortune_data":{"fortune":"吉"}}"#;
        assert_eq!(parse_envelope(raw).message, "こんにちは");
    }

    #[test]
    fn non_string_message_falls_back_to_raw_text() {
        let raw = r#"{"result":{"role":"assistant","content":[{"text":"hi"}]}}"#;
        assert_eq!(parse_envelope(raw).message, raw);

        let raw = r#"{"result":7}"#;
        assert_eq!(parse_envelope(raw).message, raw);
    }

    #[test]
    fn single_quoted_content_literal_is_unwrapped() {
        let raw = r#"{"result":"{'content':[{'text':'A'},{'text':'B'}]}"}"#;
        assert_eq!(parse_envelope(raw).message, "A\nB");
    }

    #[test]
    fn empty_content_keeps_selected_string() {
        let raw = r#"{"result":"{'content': [], 'text': 'x'}"}"#;
        assert_eq!(parse_envelope(raw).message, "{'content': [], 'text': 'x'}");
    }

    #[test]
    fn unparseable_inner_literal_keeps_selected_string() {
        let inner = r#"{'role': 'assistant', 'content': [{'text': "It's fine"}]}"#;
        let raw = json!({ "result": inner }).to_string();
        assert_eq!(parse_envelope(&raw).message, inner);
    }

    #[test]
    fn fortune_data_snake_case_is_normalized() {
        let raw = json!({
            "result": "{'role': 'assistant', 'content': [{'text': 'やったね大吉！'}]}",
            "fortune_data": {
                "fortune": "大吉",
                "score": 5,
                "lucky_color": "赤",
                "lucky_item": "コーヒー",
                "lucky_spot": "図書館",
                "message": "今日は最高の日！",
                "timestamp": "2026-01-02T09:30:00.123456"
            }
        })
        .to_string();
        let env = parse_envelope(&raw);
        assert_eq!(env.message, "やったね大吉！");
        let record = env.record.expect("record");
        assert_eq!(record.fortune, Fortune::Daikichi);
        assert_eq!(record.star_rating(), "★★★★★");
        assert_eq!(record.lucky_color, "赤");
        assert_eq!(record.lucky_item, "コーヒー");
        assert_eq!(record.lucky_spot, "図書館");
        assert_eq!(record.timestamp, "2026-01-02T09:30:00.123456");
    }

    #[test]
    fn fortune_data_camel_case_and_defaults() {
        let raw = json!({
            "result": "ok",
            "fortuneData": {
                "fortune": "末吉",
                "stars": "★★★★★",
                "luckyColor": "",
                "lucky_color": "紫",
                "luckySpot": "駅"
            }
        })
        .to_string();
        let record = parse_envelope(&raw).record.expect("record");
        assert_eq!(record.fortune, Fortune::Suekichi);
        // Upstream stars are ignored; the rating follows the label.
        assert_eq!(record.star_rating(), "★★☆☆☆");
        assert_eq!(record.lucky_color, "紫");
        assert_eq!(record.lucky_item, "");
        assert_eq!(record.lucky_spot, "駅");
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn fortune_data_with_unknown_or_missing_label_is_dropped() {
        let raw = r#"{"result":"ok","fortune_data":{"fortune":"超大吉"}}"#;
        assert_eq!(parse_envelope(raw).record, None);

        let raw = r#"{"result":"ok","fortune_data":{"lucky_color":"赤"}}"#;
        assert_eq!(parse_envelope(raw).record, None);

        let raw = r#"{"result":"ok","fortune_data":"大吉"}"#;
        assert_eq!(parse_envelope(raw).record, None);
    }

    #[test]
    fn record_is_read_even_when_message_falls_back() {
        let raw = r#"{"fortune_data":{"fortune":"凶"}}"#;
        let env = parse_envelope(raw);
        assert_eq!(env.message, raw);
        assert_eq!(env.record.map(|r| r.fortune), Some(Fortune::Kyo));
    }
}
