//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use wiremock::MockServer;

use pb_api::{ApiRequest, Authenticator, Credential, PushClient};
use pb_core::config::Settings;
use pb_core::error::PbResult;

/// base64("abc:"), the basic-auth header for token "abc".
pub const BASIC_ABC: &str = "Basic YWJjOg==";

pub fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("expected a JSON object")
}

/// Settings pointing the client at the mock server's `/v2` root.
pub fn settings_for(server: &MockServer, auth: Value) -> Settings {
    Settings::from_map(obj(json!({
        "auth": auth,
        "api": {"base_url": format!("{}/v2", server.uri()), "timeout_ms": 5_000}
    })))
    .expect("valid test settings")
}

/// Client using basic auth with token "abc".
pub fn basic_client(server: &MockServer) -> PushClient {
    let settings = settings_for(server, json!({"type": "basic", "token": "abc"}));
    PushClient::new(settings).expect("client")
}

/// Client using OAuth against the mock server's `/oauth2/token`.
pub fn oauth_client(server: &MockServer, access_token: Option<&str>) -> PushClient {
    oauth_client_with(server, access_token, 1)
}

pub fn oauth_client_with(
    server: &MockServer,
    access_token: Option<&str>,
    max_refresh_attempts: u32,
) -> PushClient {
    let mut auth = json!({
        "type": "oauth",
        "client_id": "client-1",
        "client_secret": "shh",
        "refresh_token": "refresh-1",
        "token_url": format!("{}/oauth2/token", server.uri()),
        "max_refresh_attempts": max_refresh_attempts
    });
    if let Some(token) = access_token {
        auth["access_token"] = Value::String(token.to_string());
    }
    PushClient::new(settings_for(server, auth)).expect("client")
}

/// Authenticator that records every request instead of sending it.
pub struct RecordingAuthenticator {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    response: Value,
}

impl RecordingAuthenticator {
    pub fn new(response: Value) -> (Self, Arc<Mutex<Vec<ApiRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                requests: Arc::clone(&requests),
                response,
            },
            requests,
        )
    }
}

#[async_trait]
impl Authenticator for RecordingAuthenticator {
    fn scheme(&self) -> &'static str {
        "recording"
    }

    async fn credential(&self) -> PbResult<Credential> {
        Ok(Credential::Bearer("recorded".into()))
    }

    async fn send_request(&self, request: &ApiRequest) -> PbResult<Value> {
        request.validate()?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Client whose requests are captured rather than sent.
pub fn recording_client(response: Value) -> (PushClient, Arc<Mutex<Vec<ApiRequest>>>) {
    let settings = Settings::from_map(obj(json!({
        "auth": {"type": "basic", "token": "abc"},
        "api": {"base_url": "http://pushbullet.test/v2"}
    })))
    .expect("valid test settings");
    let (auth, requests) = RecordingAuthenticator::new(response);
    (PushClient::with_authenticator(settings, Box::new(auth)), requests)
}
