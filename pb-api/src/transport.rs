//! HTTP transport for the Pushbullet REST API.
//!
//! Turns an `ApiRequest` plus an optional credential into a reqwest call,
//! maps non-2xx statuses to `PbError::Request`, and transport failures to
//! `PbError::Connection`. Nothing is retried here.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use pb_core::config::ApiConfig;
use pb_core::constants;
use pb_core::error::{PbError, PbResult};
use pb_core::platform::default_user_agent;

use crate::request::{form_pairs, ApiRequest, RequestBody};

/// Transport-level credential attached to a request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// HTTP basic auth with the token as username and an empty password.
    Basic { username: String },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Basic { .. } => f.write_str("Basic(<redacted>)"),
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Thin wrapper over reqwest::Client shared by every authenticator.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Create a transport from API configuration.
    pub fn new(config: &ApiConfig) -> PbResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(constants::CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|e| PbError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { inner })
    }

    /// Issue one HTTP exchange and return the parsed JSON body.
    ///
    /// Bodies with no content yield `Value::Null`.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> PbResult<Value> {
        request.validate()?;
        debug!(
            method = %request.method,
            url = %request.url,
            authenticated = credential.is_some(),
            multipart = !request.files.is_empty(),
            "sending request"
        );

        let builder = self.build_request(request, credential)?;
        let response = builder.send().await.map_err(Self::classify_error)?;
        let response = Self::check_status(response).await?;
        Self::parse_body(response).await
    }

    /// Internal: build a reqwest request for the descriptor.
    fn build_request(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> PbResult<RequestBuilder> {
        let mut builder = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        builder = match credential {
            Some(Credential::Basic { username }) => builder.basic_auth(username, Some("")),
            Some(Credential::Bearer(token)) => builder.bearer_auth(token),
            None => builder,
        };

        if !request.files.is_empty() {
            builder = builder.multipart(Self::multipart_form(request)?);
        } else {
            match &request.body {
                Some(RequestBody::Form(fields)) => {
                    builder = builder.form(&form_pairs(fields)?);
                }
                Some(RequestBody::Json(value)) => {
                    if request.header_value(CONTENT_TYPE.as_str()).is_none() {
                        builder = builder.header(CONTENT_TYPE, "application/json");
                    }
                    builder = builder.body(serde_json::to_vec(value)?);
                }
                None => {}
            }
        }

        // Descriptor headers replace whatever the body encoding set.
        Ok(builder.headers(Self::header_overrides(request)?))
    }

    /// Collapse descriptor headers into a map; a later entry for the same
    /// name wins.
    fn header_overrides(request: &ApiRequest) -> PbResult<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PbError::Usage(format!("invalid header name `{name}`: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| PbError::Usage(format!("invalid value for header `{name}`: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Multipart forms cannot be cloned, so one is built per attempt.
    fn multipart_form(request: &ApiRequest) -> PbResult<Form> {
        let mut form = Form::new();
        if let Some(RequestBody::Form(fields)) = &request.body {
            for (name, value) in form_pairs(fields)? {
                form = form.text(name, value);
            }
        }
        for file in &request.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| PbError::Usage(format!("invalid mime type {}: {e}", file.mime_type)))?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }

    /// Check the HTTP status code and convert to PbError if needed.
    async fn check_status(response: Response) -> PbResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request failed");
        Err(PbError::Request {
            status: status.as_u16(),
            body,
        })
    }

    /// Parse a successful response body as JSON.
    async fn parse_body(response: Response) -> PbResult<Value> {
        let text = response.text().await.map_err(Self::classify_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| PbError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Classify a reqwest error into a PbError variant.
    fn classify_error(e: reqwest::Error) -> PbError {
        if e.is_timeout() {
            PbError::Connection(format!("request timed out: {e}"))
        } else if e.is_connect() {
            PbError::Connection(format!("connection failed: {e}"))
        } else if e.is_builder() {
            PbError::Usage(format!("invalid request: {e}"))
        } else {
            PbError::Connection(e.to_string())
        }
    }
}
