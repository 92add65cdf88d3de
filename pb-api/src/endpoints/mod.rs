//! API endpoint modules organized by resource.
//!
//! Each module adds typed methods on `PushClient` for one group of
//! related endpoints.

pub mod contacts;
pub mod devices;
pub mod pushes;
pub mod upload;
pub mod users;

use serde::Serialize;
use serde_json::{Map, Value};

use pb_core::error::{PbError, PbResult};

/// Serialize a payload struct into flat request fields.
pub(crate) fn to_fields<T: Serialize>(value: &T) -> PbResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(PbError::Serialization(format!(
            "expected an object payload, got {other}"
        ))),
    }
}
