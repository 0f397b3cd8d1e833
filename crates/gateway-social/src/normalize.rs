//! Tweet shape normalization.
//!
//! Maps every known upstream shape into one canonical record. Shapes the
//! mapper does not recognize are reported as `UnrecognizedShape` instead of
//! being guessed at.

use crate::error::{SocialError, SocialResult};
use serde::Serialize;
use serde_json::Value;

/// Canonical tweet record returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetRecord {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author_id: Option<String>,
    pub author_username: String,
}

/// Extract the tweet array from an upstream response body.
///
/// Known envelopes: a bare JSON array, or an object with a `data` array.
pub fn tweet_array(body: &Value) -> SocialResult<&Vec<Value>> {
    if let Some(items) = body.as_array() {
        return Ok(items);
    }
    if let Some(items) = body.get("data").and_then(|d| d.as_array()) {
        return Ok(items);
    }
    Err(SocialError::UnrecognizedShape(format!(
        "expected array or {{\"data\": [...]}}, got {}",
        value_kind(body)
    )))
}

/// Normalize one raw tweet object.
///
/// Accepts the `id`/`tweet_id`, `text`/`content`, and `created_at`/`timestamp`
/// field-name variants. A tweet with no recognizable id or text is an
/// unrecognized shape, not an empty record.
pub fn normalize_tweet(raw: &Value, username: &str) -> SocialResult<TweetRecord> {
    let id = string_field(raw, &["id", "tweet_id"])
        .ok_or_else(|| SocialError::UnrecognizedShape("tweet has no id/tweet_id".to_string()))?;
    let text = string_field(raw, &["text", "content"])
        .ok_or_else(|| SocialError::UnrecognizedShape("tweet has no text/content".to_string()))?;
    let created_at = string_field(raw, &["created_at", "timestamp"]).unwrap_or_default();
    let author_id = string_field(raw, &["author_id"]);

    Ok(TweetRecord {
        id,
        text,
        created_at,
        author_id,
        author_username: username.to_string(),
    })
}

/// First present field among `names`, stringified.
///
/// Numeric ids are common in older payloads; they are rendered as strings.
fn string_field(raw: &Value, names: &[&str]) -> Option<String> {
    for name in names {
        match raw.get(*name) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
