use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use pb_core::config::BasicAuthSettings;
use pb_core::error::{PbError, PbResult};

use super::{rejected, Authenticator};
use crate::request::ApiRequest;
use crate::transport::{Credential, HttpTransport};

/// Static access token sent as the basic-auth username with an empty password.
///
/// There is nothing to refresh: a rejected token is reported as
/// `PbError::AuthFailed` and never retried.
pub struct BasicAuthenticator {
    transport: HttpTransport,
    credential: Credential,
}

impl BasicAuthenticator {
    pub fn new(settings: &BasicAuthSettings, transport: HttpTransport) -> Self {
        Self {
            transport,
            credential: Credential::Basic {
                username: settings.token.clone(),
            },
        }
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn scheme(&self) -> &'static str {
        "basic"
    }

    async fn credential(&self) -> PbResult<Credential> {
        Ok(self.credential.clone())
    }

    async fn send_request(&self, request: &ApiRequest) -> PbResult<Value> {
        if request.skip_auth {
            debug!(url = %request.url, "skipping authentication");
            return self.transport.execute(request, None).await;
        }

        match self.transport.execute(request, Some(&self.credential)).await {
            Err(PbError::Request { status, body }) if status == StatusCode::UNAUTHORIZED.as_u16() => {
                Err(rejected("access token rejected", status, &body))
            }
            other => other,
        }
    }
}
