//! Contact endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use pb_core::constants::paths;
use pb_core::error::{PbError, PbResult};

use super::to_fields;
use crate::client::PushClient;
use crate::request::ApiRequest;
use crate::response::take_list;

/// Fields that can be changed on an existing contact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PushClient {
    /// List contacts.
    pub async fn contacts(&self) -> PbResult<Vec<Value>> {
        let resp = self.send(ApiRequest::get(self.url(paths::CONTACTS))).await?;
        take_list(resp, "contacts")
    }

    /// Create a contact.
    pub async fn create_contact(&self, name: &str, email: &str) -> PbResult<Value> {
        if email.trim().is_empty() {
            return Err(PbError::Usage("contact email must not be empty".into()));
        }
        let mut fields = Map::new();
        fields.insert("name".into(), name.into());
        fields.insert("email".into(), email.into());
        self.send(ApiRequest::post(self.url(paths::CONTACTS)).form(fields))
            .await
    }

    /// Update a contact.
    pub async fn update_contact(&self, contact_iden: &str, update: &ContactUpdate) -> PbResult<Value> {
        let fields = to_fields(update)?;
        if fields.is_empty() {
            return Err(PbError::Usage("contact update has no fields set".into()));
        }
        self.send(ApiRequest::post(self.resource_url(paths::CONTACTS, contact_iden)).form(fields))
            .await
    }

    /// Delete a contact.
    pub async fn delete_contact(&self, contact_iden: &str) -> PbResult<()> {
        self.send(ApiRequest::delete(self.resource_url(paths::CONTACTS, contact_iden)))
            .await?;
        Ok(())
    }
}
