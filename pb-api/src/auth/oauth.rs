use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pb_core::config::OAuthSettings;
use pb_core::constants;
use pb_core::error::{PbError, PbResult};

use super::{rejected, Authenticator};
use crate::request::ApiRequest;
use crate::transport::{Credential, HttpTransport};

/// Bearer-token authenticator with refresh.
///
/// States: unauthenticated (no access token yet), authenticated, and
/// refreshing (token exchange in flight, holding the state lock). A 401
/// moves back to refreshing at most `max_refresh_attempts` times per
/// request; after that the 401 is surfaced as `PbError::AuthFailed`.
///
/// Refresh is single-flight: concurrent requests that were all rejected
/// with the same token wait on the lock, and only the first one performs
/// the exchange.
pub struct OAuthAuthenticator {
    transport: HttpTransport,
    client_id: String,
    client_secret: String,
    token_url: String,
    max_refresh_attempts: u32,
    state: Mutex<TokenState>,
}

#[derive(Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// Current token, unless it is missing or past its expiry.
    fn usable_token(&self) -> Option<&str> {
        let expired = self.expires_at.is_some_and(|at| Utc::now() >= at);
        match &self.access_token {
            Some(token) if !expired => Some(token.as_str()),
            // Without a refresh token, an expired token is still worth sending.
            Some(token) if self.refresh_token.is_none() => Some(token.as_str()),
            _ => None,
        }
    }
}

/// Token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl OAuthAuthenticator {
    pub fn new(settings: &OAuthSettings, transport: HttpTransport) -> Self {
        Self {
            transport,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            token_url: settings
                .token_url
                .clone()
                .unwrap_or_else(|| constants::DEFAULT_TOKEN_URL.to_string()),
            max_refresh_attempts: settings.max_refresh_attempts,
            state: Mutex::new(TokenState {
                access_token: settings.access_token.clone(),
                refresh_token: settings.refresh_token.clone(),
                expires_at: None,
            }),
        }
    }

    /// Return a usable access token, exchanging the refresh token if needed.
    async fn current_token(&self) -> PbResult<String> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.usable_token() {
            return Ok(token.to_string());
        }
        self.exchange(&mut state).await
    }

    /// Replace a token the server rejected.
    ///
    /// If another request already swapped it out, the newer token is
    /// returned without a second exchange.
    async fn refresh_rejected(&self, rejected_token: &str) -> PbResult<String> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.usable_token() {
            if token != rejected_token {
                debug!("token already refreshed by a concurrent request");
                return Ok(token.to_string());
            }
        }
        state.access_token = None;
        self.exchange(&mut state).await
    }

    /// Perform the refresh-token grant. Caller holds the state lock.
    async fn exchange(&self, state: &mut TokenState) -> PbResult<String> {
        let refresh_token = state.refresh_token.clone().ok_or_else(|| {
            PbError::AuthFailed("access token rejected and no refresh token is available".into())
        })?;

        info!(token_url = %self.token_url, "exchanging refresh token for access token");

        let mut form = Map::new();
        form.insert("grant_type".into(), "refresh_token".into());
        form.insert("client_id".into(), self.client_id.clone().into());
        form.insert("client_secret".into(), self.client_secret.clone().into());
        form.insert("refresh_token".into(), refresh_token.into());
        let request = ApiRequest::post(&self.token_url).form(form).skip_auth();

        let value = match self.transport.execute(&request, None).await {
            Ok(value) => value,
            Err(PbError::Request { status, body }) if (400..500).contains(&status) => {
                return Err(rejected("token refresh rejected", status, &body));
            }
            Err(e) => return Err(e),
        };

        let tokens: TokenResponse = serde_json::from_value(value)
            .map_err(|e| PbError::AuthFailed(format!("malformed token response: {e}")))?;

        state.access_token = Some(tokens.access_token.clone());
        if let Some(rt) = tokens.refresh_token {
            state.refresh_token = Some(rt);
        }
        state.expires_at = tokens.expires_in.map(|secs| {
            Utc::now() + Duration::seconds((secs - constants::TOKEN_EXPIRY_BUFFER_SECS).max(0))
        });

        Ok(tokens.access_token)
    }
}

#[async_trait]
impl Authenticator for OAuthAuthenticator {
    fn scheme(&self) -> &'static str {
        "oauth"
    }

    async fn credential(&self) -> PbResult<Credential> {
        Ok(Credential::Bearer(self.current_token().await?))
    }

    async fn send_request(&self, request: &ApiRequest) -> PbResult<Value> {
        if request.skip_auth {
            debug!(url = %request.url, "skipping authentication");
            return self.transport.execute(request, None).await;
        }
        request.validate()?;

        let mut token = self.current_token().await?;
        let mut refreshes = 0;

        loop {
            let credential = Credential::Bearer(token.clone());
            match self.transport.execute(request, Some(&credential)).await {
                Err(PbError::Request { status, body })
                    if status == StatusCode::UNAUTHORIZED.as_u16() =>
                {
                    if refreshes >= self.max_refresh_attempts {
                        return Err(rejected("access token rejected after refresh", status, &body));
                    }
                    refreshes += 1;
                    warn!(url = %request.url, attempt = refreshes, "access token rejected, refreshing");
                    token = self.refresh_rejected(&token).await?;
                }
                other => return other,
            }
        }
    }
}
