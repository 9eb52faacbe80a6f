//! Auth token acquisition for the registrar.
//!
//! The registrar only consumes the [`TokenRefresher`] capability;
//! [`UaaTokenRefresher`] is the production implementation backed by the UAA
//! client-credentials grant.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::errors::TokenError;

/// Supplies a bearer token for authenticated UAA API calls.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Obtain a token suitable for verbatim use as an `Authorization`
    /// header value.
    async fn refresh_auth_token(&self) -> Result<String, TokenError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

/// Fetches tokens from UAA via the client-credentials grant.
pub struct UaaTokenRefresher {
    token_url: String,
    client_id: String,
    client_secret: String,
    http_client: reqwest::Client,
}

impl UaaTokenRefresher {
    pub fn new(
        uaa_url: &str,
        client_id: &str,
        client_secret: &str,
        skip_tls_verify: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, TokenError> {
        let uaa_url = Url::parse(uaa_url).map_err(TokenError::InvalidUrl)?;

        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(skip_tls_verify);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(TokenError::ClientBuildFailed)?;

        Ok(Self {
            token_url: format!("{}/oauth/token", uaa_url.as_str().trim_end_matches('/')),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl TokenRefresher for UaaTokenRefresher {
    async fn refresh_auth_token(&self) -> Result<String, TokenError> {
        tracing::debug!(url = %self.token_url, client_id = %self.client_id, "Requesting UAA auth token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(TokenError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::UnexpectedStatus { status, body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(TokenError::MalformedResponse)?;

        Ok(format!("{} {}", token.token_type, token.access_token))
    }
}
