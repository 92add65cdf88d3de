//! Response types.
//!
//! Most endpoints return loosely typed JSON objects that are passed back as
//! `serde_json::Value`. The upload ticket and the error envelope are typed
//! because the client itself reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pb_core::error::{PbError, PbResult};

/// Response of the upload-request endpoint.
///
/// ```json
/// { "file_name": "cat.jpg", "file_type": "image/jpeg",
///   "file_url": "https://dl.example/…/cat.jpg",
///   "upload_url": "https://upload.example/…",
///   "data": { "awsaccesskeyid": "…", "signature": "…" } }
/// ```
///
/// `upload_url` is one-time: a failed submission needs a new ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub file_name: String,
    pub file_type: String,
    /// Where the file can be downloaded once submitted.
    #[serde(default)]
    pub file_url: Option<String>,
    pub upload_url: String,
    /// Extra form fields the storage backend requires.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Other fields echoed by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error envelope returned by the service on failure.
///
/// ```json
/// { "error": { "type": "invalid_request", "message": "Access token is missing or invalid.", "cat": "~(=^‥^)ノ" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ServiceError,
}

/// Service error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error type identifier.
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// Error message.
    pub message: Option<String>,
}

/// Extract a human-readable message from a raw error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error.message)
}

/// Pull a list field (e.g. `devices`, `pushes`) out of a response object.
pub fn take_list(mut response: Value, key: &str) -> PbResult<Vec<Value>> {
    match response.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(PbError::Serialization(format!(
            "expected `{key}` to be a list, got {other}"
        ))),
        None => Err(PbError::Serialization(format!(
            "response has no `{key}` field"
        ))),
    }
}
