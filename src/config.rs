//! Environment-based configuration types for the firehose registrar.

use anyhow::Result;
use std::time::Duration;

use crate::errors::ConfigError;

/// HTTP client timeout configuration; `None` waits indefinitely
#[derive(Clone, Default)]
pub struct HttpClientTimeout(Option<Duration>);

/// TLS certificate validation bypass configuration
#[derive(Clone, Default)]
pub struct SkipTlsVerify(bool);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub uaa_url: String,
    pub uaa_client_id: String,
    pub uaa_client_secret: String,
    pub firehose_client_id: String,
    pub firehose_client_secret: String,
    pub skip_tls_verify: SkipTlsVerify,
    pub http_client_timeout: HttpClientTimeout,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let uaa_url = require_env("UAA_URL")?;
        let uaa_client_id = require_env("UAA_CLIENT_ID")?;
        let uaa_client_secret = require_env("UAA_CLIENT_SECRET")?;
        let firehose_client_id = default_env("FIREHOSE_CLIENT_ID", "firehose-consumer");
        let firehose_client_secret = require_env("FIREHOSE_CLIENT_SECRET")?;
        let skip_tls_verify: SkipTlsVerify =
            default_env("SKIP_SSL_VALIDATION", "false").try_into()?;
        let http_client_timeout: HttpClientTimeout =
            default_env("HTTP_CLIENT_TIMEOUT", "").try_into()?;

        Ok(Self {
            version: version()?,
            uaa_url,
            uaa_client_id,
            uaa_client_secret,
            firehose_client_id,
            firehose_client_secret,
            skip_tls_verify,
            http_client_timeout,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarRequired(name.to_string()).into())
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

impl TryFrom<String> for SkipTlsVerify {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "" | "false" | "0" | "no" | "off" => Ok(Self(false)),
            "true" | "1" | "yes" | "on" => Ok(Self(true)),
            _ => Err(ConfigError::BoolParsingFailed(value)),
        }
    }
}

impl AsRef<bool> for SkipTlsVerify {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

impl TryFrom<String> for HttpClientTimeout {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(None));
        }

        // Parse duration strings like "10s", "5m", or bare seconds.
        if value.ends_with('s') {
            let seconds = value
                .trim_end_matches('s')
                .parse::<u64>()
                .map_err(ConfigError::TimeoutParsingFailed)?;
            Ok(Self(Some(Duration::from_secs(seconds))))
        } else if value.ends_with('m') {
            let minutes = value
                .trim_end_matches('m')
                .parse::<u64>()
                .map_err(ConfigError::TimeoutParsingFailed)?;
            Ok(Self(Some(Duration::from_secs(minutes * 60))))
        } else {
            let seconds = value
                .parse::<u64>()
                .map_err(ConfigError::TimeoutParsingFailed)?;
            Ok(Self(Some(Duration::from_secs(seconds))))
        }
    }
}

impl AsRef<Option<Duration>> for HttpClientTimeout {
    fn as_ref(&self) -> &Option<Duration> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_tls_verify_accepts_common_spellings() {
        for value in ["true", "1", "yes", "on", "TRUE"] {
            let parsed: SkipTlsVerify = value.to_string().try_into().unwrap();
            assert!(*parsed.as_ref(), "{value} should parse as true");
        }
        for value in ["", "false", "0", "no", "off"] {
            let parsed: SkipTlsVerify = value.to_string().try_into().unwrap();
            assert!(!*parsed.as_ref(), "{value:?} should parse as false");
        }
    }

    #[test]
    fn skip_tls_verify_rejects_garbage() {
        let result = SkipTlsVerify::try_from("maybe".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn http_client_timeout_parses_suffixed_durations() {
        let parsed = HttpClientTimeout::try_from("10s".to_string()).unwrap();
        assert_eq!(*parsed.as_ref(), Some(Duration::from_secs(10)));

        let parsed = HttpClientTimeout::try_from("5m".to_string()).unwrap();
        assert_eq!(*parsed.as_ref(), Some(Duration::from_secs(300)));

        let parsed = HttpClientTimeout::try_from("30".to_string()).unwrap();
        assert_eq!(*parsed.as_ref(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn http_client_timeout_empty_means_no_timeout() {
        let parsed = HttpClientTimeout::try_from(String::new()).unwrap();
        assert_eq!(*parsed.as_ref(), None);
    }

    #[test]
    fn http_client_timeout_rejects_garbage() {
        assert!(HttpClientTimeout::try_from("soon".to_string()).is_err());
    }
}
