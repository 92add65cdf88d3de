//! Push endpoints.
//!
//! Each push kind has its own variant with the fields the service requires
//! for it, so a malformed push is rejected before it is sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pb_core::constants::{paths, push_types};
use pb_core::error::{PbError, PbResult};

use super::to_fields;
use crate::client::PushClient;
use crate::request::ApiRequest;
use crate::response::{take_list, UploadTicket};

/// A push payload. Serializes with its kind in the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Push {
    Note {
        title: String,
        body: String,
    },
    Link {
        title: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Address {
        name: String,
        address: String,
    },
    List {
        title: String,
        items: Vec<String>,
    },
    File {
        file_name: String,
        file_type: String,
        file_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
}

impl Push {
    /// The `type` discriminator for this push.
    pub fn kind(&self) -> &'static str {
        match self {
            Push::Note { .. } => push_types::NOTE,
            Push::Link { .. } => push_types::LINK,
            Push::Address { .. } => push_types::ADDRESS,
            Push::List { .. } => push_types::LIST,
            Push::File { .. } => push_types::FILE,
        }
    }

    /// Build a file push pointing at an uploaded file.
    pub fn from_ticket(ticket: &UploadTicket, body: Option<String>) -> PbResult<Self> {
        let file_url = ticket.file_url.clone().ok_or_else(|| {
            PbError::Usage(format!("upload ticket for {} has no file_url", ticket.file_name))
        })?;
        Ok(Push::File {
            file_name: ticket.file_name.clone(),
            file_type: ticket.file_type.clone(),
            file_url,
            body,
        })
    }

    /// Reject pushes missing a field the service cannot do without.
    pub fn validate(&self) -> PbResult<()> {
        let missing = match self {
            Push::Link { url, .. } if url.trim().is_empty() => Some("url"),
            Push::Address { address, .. } if address.trim().is_empty() => Some("address"),
            Push::File { file_url, .. } if file_url.trim().is_empty() => Some("file_url"),
            Push::File { file_name, .. } if file_name.trim().is_empty() => Some("file_name"),
            _ => None,
        };
        match missing {
            Some(field) => Err(PbError::Usage(format!(
                "{} push requires a non-empty {field}",
                self.kind()
            ))),
            None => Ok(()),
        }
    }
}

/// Recipient of a push. With neither field set the push goes to all of
/// the user's devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_iden: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PushTarget {
    /// Every device of the current user.
    pub fn all_devices() -> Self {
        Self::default()
    }

    pub fn device(iden: impl Into<String>) -> Self {
        Self {
            device_iden: Some(iden.into()),
            email: None,
        }
    }

    pub fn email(address: impl Into<String>) -> Self {
        Self {
            device_iden: None,
            email: Some(address.into()),
        }
    }

    fn validate(&self) -> PbResult<()> {
        if self.device_iden.is_some() && self.email.is_some() {
            return Err(PbError::Usage(
                "push target takes a device_iden or an email, not both".into(),
            ));
        }
        Ok(())
    }
}

/// Merge a push and its target into one set of request fields.
pub fn push_fields(push: &Push, target: &PushTarget) -> PbResult<Map<String, Value>> {
    push.validate()?;
    target.validate()?;
    let mut fields = to_fields(push)?;
    fields.extend(to_fields(target)?);
    Ok(fields)
}

impl PushClient {
    /// Send a push.
    pub async fn push(&self, push: &Push, target: &PushTarget) -> PbResult<Value> {
        let fields = push_fields(push, target)?;
        self.send(ApiRequest::post(self.url(paths::PUSHES)).form(fields))
            .await
    }

    /// Pushes created or modified after the given UNIX timestamp.
    pub async fn push_history(&self, modified_after: f64) -> PbResult<Vec<Value>> {
        let resp = self
            .send(ApiRequest::get(self.url(paths::PUSHES)).param("modified_after", modified_after))
            .await?;
        take_list(resp, "pushes")
    }

    /// Mark a push as dismissed.
    pub async fn dismiss_push(&self, push_iden: &str) -> PbResult<Value> {
        let mut fields = Map::new();
        fields.insert("dismissed".into(), "true".into());
        self.send(ApiRequest::post(self.resource_url(paths::PUSHES, push_iden)).form(fields))
            .await
    }

    /// Delete a push.
    pub async fn delete_push(&self, push_iden: &str) -> PbResult<()> {
        self.send(ApiRequest::delete(self.resource_url(paths::PUSHES, push_iden)))
            .await?;
        Ok(())
    }
}
