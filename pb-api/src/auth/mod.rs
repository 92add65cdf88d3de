//! Authentication strategies.
//!
//! An `Authenticator` attaches service credentials to a request descriptor
//! and performs the exchange. The variant is chosen once, from the
//! `auth.type` tag in settings; call sites only ever see the trait.

mod basic;
mod oauth;

pub use basic::BasicAuthenticator;
pub use oauth::OAuthAuthenticator;

use async_trait::async_trait;
use serde_json::Value;

use pb_core::config::AuthSettings;
use pb_core::error::{PbError, PbResult};

use crate::request::ApiRequest;
use crate::response::error_message;
use crate::transport::{Credential, HttpTransport};

/// Uniform request contract shared by every authentication scheme.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Scheme name as it appears in `auth.type`.
    fn scheme(&self) -> &'static str;

    /// Credential that would be attached to the next authenticated request.
    async fn credential(&self) -> PbResult<Credential>;

    /// Send `request`, authenticated unless `request.skip_auth` is set.
    ///
    /// Returns the parsed JSON body (`Value::Null` for empty bodies).
    async fn send_request(&self, request: &ApiRequest) -> PbResult<Value>;
}

/// Construct the authenticator named by the settings' `auth.type`.
pub fn build_authenticator(
    settings: &AuthSettings,
    transport: HttpTransport,
) -> Box<dyn Authenticator> {
    match settings {
        AuthSettings::Basic(basic) => Box::new(BasicAuthenticator::new(basic, transport)),
        AuthSettings::OAuth(oauth) => Box::new(OAuthAuthenticator::new(oauth, transport)),
    }
}

/// Build the error surfaced when the service rejects a credential.
pub(crate) fn rejected(context: &str, status: u16, body: &str) -> PbError {
    let detail = error_message(body).unwrap_or_else(|| body.to_string());
    PbError::AuthFailed(format!("{context} (status {status}): {detail}"))
}
