//! JSON request-body parsing and response-body pretty printing.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;

const INDENT: &[u8] = b"    ";

/// The request body was not valid JSON. Carries `serde_json`'s message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PayloadError(pub String);

/// Parse a request body. Blank text means "no body".
pub fn parse_body(text: &str) -> Result<Option<Value>, PayloadError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| PayloadError(e.to_string()))
}

/// Re-indent `text` if it is JSON, otherwise hand it back untouched.
///
/// Keys keep their encounter order and non-ASCII characters are written
/// literally.
pub fn pretty_print(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => to_pretty_string(&value).unwrap_or_else(|| text.to_string()),
        Err(_) => text.to_string(),
    }
}

/// `pretty_print` for an optional body; `None` stays `None`.
pub fn pretty_print_opt(text: Option<&str>) -> Option<String> {
    text.map(pretty_print)
}

/// True when a `Content-Type` value declares JSON.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.contains("application/json")
}

fn to_pretty_string(value: &Value) -> Option<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser).ok()?;
    String::from_utf8(out).ok()
}
