//! Current-user endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use pb_core::constants::paths;
use pb_core::error::PbResult;

use crate::client::PushClient;
use crate::request::ApiRequest;

/// Update to the current user's profile. Sent as JSON because
/// `preferences` is a nested object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    pub preferences: Map<String, Value>,
}

impl PushClient {
    /// Get the current user.
    pub async fn me(&self) -> PbResult<Value> {
        self.send(ApiRequest::get(self.url(paths::ME))).await
    }

    /// Update the current user's preferences.
    pub async fn update_me(&self, update: &UserUpdate) -> PbResult<Value> {
        let body = serde_json::to_value(update)?;
        self.send(ApiRequest::post(self.url(paths::ME)).json(body))
            .await
    }
}
