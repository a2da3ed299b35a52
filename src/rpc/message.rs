//! Wire types for JSON-RPC requests and responses.
//!
//! Requests carry their parameters as a JSON array, the convention used by
//! stream-based JSON-RPC servers. Responses are accepted in both shapes seen
//! in practice: an error object with `code`/`message`, or a bare string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker for calls that take no parameters.
///
/// Serialises to `null`, which [`Request::new`] turns into an empty
/// `params` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoParams;

/// An outgoing JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

impl Request {
    /// Build a request from an already-serialised parameter value.
    ///
    /// `null` means "no parameters" and produces `"params": []`; anything
    /// else is wrapped as the single element of the array.
    pub fn new(method: &str, params: Value, id: u64) -> Self {
        let params = if params.is_null() {
            Vec::new()
        } else {
            vec![params]
        };

        Self {
            method: method.to_string(),
            params,
            id,
        }
    }
}

/// JSON-RPC error object (`{"code": .., "message": .., "data": ..}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// The `error` member of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseError {
    /// Structured error object.
    Object(ErrorObject),
    /// Plain message, as sent by servers that report errors as strings.
    Message(String),
    /// Anything else; kept verbatim.
    Other(Value),
}

impl ResponseError {
    /// Human-readable message.
    pub fn message(&self) -> String {
        match self {
            ResponseError::Object(obj) => obj.message.clone(),
            ResponseError::Message(msg) => msg.clone(),
            ResponseError::Other(value) => value.to_string(),
        }
    }
}

/// An incoming JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_error")]
    pub error: Option<ResponseError>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl Response {
    /// Whether this response answers the request with the given id.
    ///
    /// Servers echo the id back either as a number or, for string ids, as
    /// the same string; only numeric ids are ever sent by this client.
    pub fn matches_id(&self, id: u64) -> bool {
        match &self.id {
            Some(Value::Number(n)) => n.as_u64() == Some(id),
            _ => false,
        }
    }
}

/// `"error": null` must read as "no error", not as `Some(Other(Null))`.
fn deserialize_error<'de, D>(deserializer: D) -> Result<Option<ResponseError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<ResponseError>::deserialize(deserializer)?;
    Ok(value.filter(|err| !matches!(err, ResponseError::Other(Value::Null))))
}
