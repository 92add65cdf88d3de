//! Device endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use pb_core::constants::paths;
use pb_core::error::{PbError, PbResult};

use super::to_fields;
use crate::client::PushClient;
use crate::request::ApiRequest;
use crate::response::take_list;

/// Fields that can be changed on an existing device. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_sms: Option<bool>,
}

impl PushClient {
    /// List devices.
    pub async fn devices(&self) -> PbResult<Vec<Value>> {
        let resp = self.send(ApiRequest::get(self.url(paths::DEVICES))).await?;
        take_list(resp, "devices")
    }

    /// Register a new device.
    pub async fn create_device(&self, nickname: &str, device_type: &str) -> PbResult<Value> {
        let mut fields = Map::new();
        fields.insert("type".into(), device_type.into());
        fields.insert("nickname".into(), nickname.into());
        self.send(ApiRequest::post(self.url(paths::DEVICES)).form(fields))
            .await
    }

    /// Update an existing device.
    pub async fn update_device(&self, device_iden: &str, update: &DeviceUpdate) -> PbResult<Value> {
        let fields = to_fields(update)?;
        if fields.is_empty() {
            return Err(PbError::Usage("device update has no fields set".into()));
        }
        self.send(ApiRequest::post(self.resource_url(paths::DEVICES, device_iden)).form(fields))
            .await
    }

    /// Delete a device.
    pub async fn delete_device(&self, device_iden: &str) -> PbResult<()> {
        self.send(ApiRequest::delete(self.resource_url(paths::DEVICES, device_iden)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_update_skips_unset() {
        let update = DeviceUpdate {
            nickname: Some("Work laptop".into()),
            has_sms: Some(false),
            ..Default::default()
        };
        let fields = to_fields(&update).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["nickname"], "Work laptop");
        assert_eq!(fields["has_sms"], false);
    }
}
