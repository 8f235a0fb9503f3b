//! Payloads exchanged with the task-manager backend.
//!
//! Both endpoints wrap their results in a `reports` envelope. Envelopes are
//! walked as a [`Value`] so their shape is checked before any field is read;
//! only an individual chat report, once known to be an object, goes through
//! serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest<'a> {
    pub utterance: &'a str,
    /// Empty when no session exists yet; the backend then creates one.
    pub session_id: &'a str,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ChatReport {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Decodes the first report of a chat envelope.
///
/// `Ok(None)` means the envelope carried no reports (`reports` absent, null,
/// or empty). The envelope and the report must both be JSON objects; serde
/// alone would also accept arrays and match their elements by position.
pub fn first_chat_report(envelope: &Value) -> Result<Option<ChatReport>, String> {
    let Some(envelope) = envelope.as_object() else {
        return Err(format!(
            "expected an object, found {}",
            json_kind(envelope)
        ));
    };

    let reports = match envelope.get("reports") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(reports)) => reports,
        Some(other) => {
            return Err(format!(
                "'reports' should be an array, found {}",
                json_kind(other)
            ))
        }
    };

    let Some(first) = reports.first() else {
        return Ok(None);
    };
    if !first.is_object() {
        return Err(format!(
            "report should be an object, found {}",
            json_kind(first)
        ));
    }
    ChatReport::deserialize(first)
        .map(Some)
        .map_err(|err| err.to_string())
}

/// Returns the raw task records carried by a task-listing envelope.
///
/// The list is `reports[0]` only when that element exists and is itself an
/// array. Every other shape yields an empty slice.
pub fn task_records(envelope: &Value) -> &[Value] {
    envelope
        .get("reports")
        .and_then(Value::as_array)
        .and_then(|reports| reports.first())
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Describes a JSON value's type for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
