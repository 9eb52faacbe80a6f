//! Reconciliation of the firehose consumer's UAA client registration.
//!
//! Runs a short, strictly ordered protocol against the UAA client endpoints:
//! look up the registration, create it when absent, otherwise update its
//! grant/scope metadata and then set its secret. The first non-matching
//! response aborts the call with a step-specific error.

use http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;
use url::Url;

use crate::errors::RegistrarError;
use crate::uaa::token::TokenRefresher;
use crate::uaa::types::{ClientRegistration, ClientUpdate, SecretUpdate};

/// Ensures the firehose consumer's client registration exists in UAA with the
/// fixed scope/grant-type sets and the desired secret.
///
/// The auth token is fetched exactly once at construction and installed as a
/// default header on the HTTP client, which is reused for every request. The
/// registrar is immutable after construction and safe to share across tasks.
#[derive(Debug)]
pub struct UaaRegistrar {
    base_url: String,
    http_client: reqwest::Client,
}

impl UaaRegistrar {
    /// Create a registrar, fetching an auth token once via `token_refresher`.
    ///
    /// A token refresh failure is returned unchanged and no HTTP client is
    /// built. No request is made against `base_url` here.
    pub async fn new(
        base_url: &str,
        token_refresher: &dyn TokenRefresher,
        skip_tls_verify: bool,
    ) -> Result<Self, RegistrarError> {
        Self::with_timeout(base_url, token_refresher, skip_tls_verify, None).await
    }

    /// Like [`UaaRegistrar::new`] with an explicit per-request timeout.
    /// `None` waits indefinitely.
    pub async fn with_timeout(
        base_url: &str,
        token_refresher: &dyn TokenRefresher,
        skip_tls_verify: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, RegistrarError> {
        let base_url = Url::parse(base_url).map_err(RegistrarError::InvalidUrl)?;
        let token = token_refresher.refresh_auth_token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token).map_err(RegistrarError::InvalidAuthToken)?,
        );

        // Redirects are never followed; a 3xx is classified like any other
        // unexpected status by the step that saw it.
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(skip_tls_verify);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(RegistrarError::ClientBuildFailed)?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Converge the firehose consumer registration to the desired state.
    ///
    /// Creates the registration when UAA reports it absent; otherwise updates
    /// its metadata and then sets the secret, whether or not the secret
    /// changed. Each call is independent and idempotent with respect to the
    /// desired end state.
    pub async fn register_firehose(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), RegistrarError> {
        if self.firehose_exists(client_id).await? {
            tracing::debug!(%client_id, "Firehose client present, updating registration");
            self.update_firehose(client_id).await?;
            self.update_firehose_secret(client_id, client_secret).await?;
        } else {
            tracing::debug!(%client_id, "Firehose client absent, creating registration");
            self.create_firehose(client_id, client_secret).await?;
        }

        tracing::info!(%client_id, "Firehose client registration reconciled");
        Ok(())
    }

    async fn firehose_exists(&self, client_id: &str) -> Result<bool, RegistrarError> {
        let url = format!("{}/oauth/clients/{}", self.base_url, client_id);
        let response =
            self.http_client
                .get(&url)
                .send()
                .await
                .map_err(|err| RegistrarError::ExistenceCheck {
                    status: None,
                    detail: err.to_string(),
                })?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(RegistrarError::ExistenceCheck {
                status: Some(status),
                detail: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn create_firehose(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), RegistrarError> {
        let url = format!("{}/oauth/clients", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&ClientRegistration::firehose(client_id, client_secret))
            .send()
            .await
            .map_err(|err| RegistrarError::CreateClient {
                status: None,
                detail: err.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(RegistrarError::CreateClient {
                status: Some(status),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn update_firehose(&self, client_id: &str) -> Result<(), RegistrarError> {
        let url = format!("{}/oauth/clients/{}", self.base_url, client_id);
        let response = self
            .http_client
            .put(&url)
            .json(&ClientUpdate::firehose(client_id))
            .send()
            .await
            .map_err(|err| RegistrarError::UpdateClient {
                status: None,
                detail: err.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistrarError::UpdateClient {
                status: Some(status),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn update_firehose_secret(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), RegistrarError> {
        let url = format!("{}/oauth/clients/{}/secret", self.base_url, client_id);
        let response = self
            .http_client
            .put(&url)
            .json(&SecretUpdate {
                secret: client_secret.to_string(),
            })
            .send()
            .await
            .map_err(|err| RegistrarError::UpdateSecret {
                status: None,
                detail: err.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistrarError::UpdateSecret {
                status: Some(status),
                detail: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TokenError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockTokenRefresher {
        result: Mutex<Option<Result<String, TokenError>>>,
        calls: AtomicUsize,
    }

    impl MockTokenRefresher {
        fn returning(token: &str) -> Self {
            Self {
                result: Mutex::new(Some(Ok(token.to_string()))),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: TokenError) -> Self {
            Self {
                result: Mutex::new(Some(Err(err))),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenRefresher for MockTokenRefresher {
        async fn refresh_auth_token(&self) -> Result<String, TokenError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("refresh_auth_token called more than once")
        }
    }

    #[tokio::test]
    async fn new_fetches_auth_token_exactly_once() {
        let refresher = MockTokenRefresher::returning("my-token");

        let registrar = UaaRegistrar::new("https://uaa.example.com", &refresher, true).await;

        assert!(registrar.is_ok());
        assert_eq!(refresher.calls(), 1);
    }

    #[tokio::test]
    async fn new_propagates_token_refresh_error() {
        let refresher = MockTokenRefresher::failing(TokenError::UnexpectedStatus {
            status: StatusCode::UNAUTHORIZED,
            body: "bad credentials".to_string(),
        });

        let err = UaaRegistrar::new("https://uaa.example.com", &refresher, true)
            .await
            .unwrap_err();

        match err {
            RegistrarError::TokenRefresh(TokenError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "bad credentials");
            }
            other => panic!("expected TokenRefresh, got {other:?}"),
        }
        assert_eq!(refresher.calls(), 1);
    }

    #[tokio::test]
    async fn new_rejects_unparseable_base_url() {
        let refresher = MockTokenRefresher::returning("my-token");

        let err = UaaRegistrar::new("not a url", &refresher, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::InvalidUrl(_)));
        assert_eq!(refresher.calls(), 0);
    }

    #[tokio::test]
    async fn new_rejects_token_unusable_as_header_value() {
        let refresher = MockTokenRefresher::returning("bearer\nabc");

        let err = UaaRegistrar::new("https://uaa.example.com", &refresher, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::InvalidAuthToken(_)));
    }
}
