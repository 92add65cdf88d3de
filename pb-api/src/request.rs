//! Request descriptors.
//!
//! An `ApiRequest` describes one HTTP exchange independently of how it is
//! authenticated. Authenticators take a descriptor, attach credentials,
//! and hand it to the transport.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use pb_core::error::{PbError, PbResult};

/// HTTP methods the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = PbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(PbError::Usage(format!(
                "unsupported HTTP method `{other}`, expected GET, POST or DELETE"
            ))),
        }
    }
}

/// Request payload with an explicit encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Flat fields, sent form-encoded, or as text parts alongside files.
    Form(Map<String, Value>),
    /// Sent as `application/json`.
    Json(Value),
}

/// A file attached to a multipart request.
#[derive(Clone, PartialEq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Description of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub method: HttpMethod,
    /// Header overrides, applied after the body's own content type.
    pub headers: Vec<(String, String)>,
    /// Query string parameters.
    pub params: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Multipart attachments. Non-empty turns the request into multipart.
    pub files: Vec<FilePart>,
    /// Send without any service credentials (pre-signed upload URLs).
    pub skip_auth: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            params: Vec::new(),
            body: None,
            files: Vec::new(),
            skip_auth: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Form-encoded body.
    pub fn form(mut self, fields: Map<String, Value>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// JSON body. Sets the content type explicitly.
    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
        self.headers
            .push(("content-type".into(), "application/json".into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Reject descriptors the transport cannot express.
    pub fn validate(&self) -> PbResult<()> {
        if self.url.trim().is_empty() {
            return Err(PbError::Usage("request url must not be empty".into()));
        }
        if !self.files.is_empty() {
            if self.method != HttpMethod::Post {
                return Err(PbError::Usage(format!(
                    "file attachments require POST, got {}",
                    self.method
                )));
            }
            if matches!(self.body, Some(RequestBody::Json(_))) {
                return Err(PbError::Usage(
                    "file attachments cannot be combined with a JSON body".into(),
                ));
            }
        }
        if let Some(RequestBody::Form(fields)) = &self.body {
            form_pairs(fields)?;
        }
        Ok(())
    }

    /// Header override lookup, case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Flatten form fields into name/value pairs.
///
/// Scalars are stringified, arrays repeat the field name once per element,
/// nulls are dropped. Nested objects are rejected.
pub fn form_pairs(fields: &Map<String, Value>) -> PbResult<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((name.clone(), scalar_to_string(name, item)?));
                }
            }
            Value::Null => {}
            other => pairs.push((name.clone(), scalar_to_string(name, other)?)),
        }
    }
    Ok(pairs)
}

fn scalar_to_string(name: &str, value: &Value) -> PbResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(PbError::Usage(format!(
            "form field `{name}` must be a flat value"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        let err = "PUT".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, PbError::Usage(_)));
    }

    #[test]
    fn test_form_pairs_flattening() {
        let pairs = form_pairs(&obj(json!({
            "type": "list",
            "items": ["a", "b"],
            "dismissed": true,
            "n": 3,
            "skip": null
        })))
        .unwrap();
        assert!(pairs.contains(&("type".into(), "list".into())));
        assert!(pairs.contains(&("items".into(), "a".into())));
        assert!(pairs.contains(&("items".into(), "b".into())));
        assert!(pairs.contains(&("dismissed".into(), "true".into())));
        assert!(pairs.contains(&("n".into(), "3".into())));
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn test_form_pairs_rejects_nested() {
        let err = form_pairs(&obj(json!({"prefs": {"a": 1}}))).unwrap_err();
        assert!(matches!(err, PbError::Usage(msg) if msg.contains("prefs")));
    }

    #[test]
    fn test_validate_empty_url() {
        let err = ApiRequest::get("  ").validate().unwrap_err();
        assert!(matches!(err, PbError::Usage(_)));
    }

    #[test]
    fn test_validate_files_need_post_and_form() {
        let part = FilePart {
            field: "file".into(),
            file_name: "a.txt".into(),
            mime_type: "text/plain".into(),
            bytes: b"hi".to_vec(),
        };
        assert!(ApiRequest::get("http://x").file(part.clone()).validate().is_err());
        assert!(ApiRequest::post("http://x")
            .json(json!({}))
            .file(part.clone())
            .validate()
            .is_err());
        assert!(ApiRequest::post("http://x")
            .form(Map::new())
            .file(part)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_json_sets_content_type_once() {
        let req = ApiRequest::post("http://x")
            .header("Content-Type", "text/plain")
            .json(json!({"a": 1}));
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_file_part_debug_hides_bytes() {
        let part = FilePart {
            field: "file".into(),
            file_name: "a.bin".into(),
            mime_type: "application/octet-stream".into(),
            bytes: vec![0u8; 2048],
        };
        let dbg = format!("{part:?}");
        assert!(dbg.contains("len: 2048"));
    }
}
