//! Client facade for the Pushbullet REST API.
//!
//! `PushClient` owns the merged settings and the authenticator chosen from
//! them. Endpoint groups in `crate::endpoints` add methods to it; every one
//! of them builds an `ApiRequest` and hands it to `PushClient::send`.

use serde_json::Value;
use tracing::debug;

use pb_core::config::{Settings, SettingsInput, SettingsLoader};
use pb_core::error::PbResult;

use crate::auth::{build_authenticator, Authenticator};
use crate::request::ApiRequest;
use crate::transport::HttpTransport;

/// Pushbullet API client.
pub struct PushClient {
    settings: Settings,
    auth: Box<dyn Authenticator>,
    /// API root without trailing slash (e.g. "https://api.pushbullet.com/v2").
    base_url: String,
}

impl PushClient {
    /// Create a client from already-merged settings.
    pub fn new(settings: Settings) -> PbResult<Self> {
        let transport = HttpTransport::new(&settings.api)?;
        let auth = build_authenticator(&settings.auth, transport);
        Ok(Self::with_authenticator(settings, auth))
    }

    /// Load settings through `loader`, layering `input` over the global file.
    pub fn from_loader(loader: &SettingsLoader, input: Option<SettingsInput>) -> PbResult<Self> {
        let settings = loader.load(input)?;
        Self::new(settings)
    }

    /// Load settings from `~/.pushbulletrc`, layering `input` over it.
    pub fn from_default_settings(input: Option<SettingsInput>) -> PbResult<Self> {
        Self::from_loader(&SettingsLoader::from_default_location()?, input)
    }

    /// Create a client around a caller-supplied authenticator.
    pub fn with_authenticator(settings: Settings, auth: Box<dyn Authenticator>) -> Self {
        let base_url = settings.api.base_url.trim_end_matches('/').to_string();
        debug!(auth = auth.scheme(), base_url = %base_url, "client created");
        Self {
            settings,
            auth,
            base_url,
        }
    }

    /// Settings the client was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The active authenticator.
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.auth.as_ref()
    }

    /// Get the API root URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Full URL for a single resource under `collection`.
    pub(crate) fn resource_url(&self, collection: &str, iden: &str) -> String {
        format!("{}{collection}/{iden}", self.base_url)
    }

    /// Send a request through the active authenticator.
    pub async fn send(&self, request: ApiRequest) -> PbResult<Value> {
        self.auth.send_request(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(base_url: &str) -> Settings {
        Settings::from_map(
            json!({
                "auth": {"type": "basic", "token": "abc"},
                "api": {"base_url": base_url}
            })
            .as_object()
            .cloned()
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = PushClient::new(settings("http://localhost:1234/v2/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/v2");
        assert_eq!(client.url("/devices"), "http://localhost:1234/v2/devices");
        assert_eq!(
            client.resource_url("/pushes", "ujpah72o0"),
            "http://localhost:1234/v2/pushes/ujpah72o0"
        );
    }

    #[test]
    fn test_authenticator_selected_from_settings() {
        let client = PushClient::new(settings("http://localhost:1234/v2")).unwrap();
        assert_eq!(client.authenticator().scheme(), "basic");

        let oauth = Settings::from_map(
            json!({
                "auth": {"type": "oauth", "client_id": "id", "client_secret": "s", "refresh_token": "r"}
            })
            .as_object()
            .cloned()
            .unwrap(),
        )
        .unwrap();
        let client = PushClient::new(oauth).unwrap();
        assert_eq!(client.authenticator().scheme(), "oauth");
    }
}
