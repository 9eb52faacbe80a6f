//! Standardized error types following the `error-registrar-<domain>-<number>` format.

use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-registrar-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when HTTP client timeout cannot be parsed
    #[error("error-registrar-config-2 Failed to parse HTTP client timeout: {0}")]
    TimeoutParsingFailed(std::num::ParseIntError),

    /// Error when boolean string cannot be parsed
    #[error(
        "error-registrar-config-3 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),

    /// Error when version information is not available
    #[error("error-registrar-config-4 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,
}

/// Errors raised while obtaining an auth token from UAA
#[derive(Debug, Error)]
pub enum TokenError {
    /// Error when the UAA base URL cannot be parsed
    #[error("error-registrar-token-1 Invalid UAA URL: {0}")]
    InvalidUrl(url::ParseError),

    /// Error when the token HTTP client cannot be built
    #[error("error-registrar-token-2 Building token HTTP client failed: {0}")]
    ClientBuildFailed(reqwest::Error),

    /// Error when the token request does not complete
    #[error("error-registrar-token-3 Token request failed: {0}")]
    RequestFailed(reqwest::Error),

    /// Error when the token endpoint answers with a non-success status
    #[error("error-registrar-token-4 Token endpoint returned {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// Error when the token response body cannot be decoded
    #[error("error-registrar-token-5 Malformed token response: {0}")]
    MalformedResponse(reqwest::Error),
}

/// Errors raised by the firehose client registrar
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// The token collaborator failed; carried through unchanged
    #[error(transparent)]
    TokenRefresh(#[from] TokenError),

    /// Error when the UAA base URL cannot be parsed
    #[error("error-registrar-uaa-1 Invalid UAA URL: {0}")]
    InvalidUrl(url::ParseError),

    /// Error when the fetched token is not usable as an Authorization header value
    #[error("error-registrar-uaa-2 Auth token is not a valid header value: {0}")]
    InvalidAuthToken(http::header::InvalidHeaderValue),

    /// Error when the authenticated HTTP client cannot be built
    #[error("error-registrar-uaa-3 Building registrar HTTP client failed: {0}")]
    ClientBuildFailed(reqwest::Error),

    /// Error when the client existence check cannot be resolved to exists/absent
    #[error("error-registrar-uaa-4 Client existence check failed ({}): {detail}", fmt_status(.status))]
    ExistenceCheck {
        status: Option<StatusCode>,
        detail: String,
    },

    /// Error when creating the client registration fails
    #[error("error-registrar-uaa-5 Creating client registration failed ({}): {detail}", fmt_status(.status))]
    CreateClient {
        status: Option<StatusCode>,
        detail: String,
    },

    /// Error when updating the client registration fails
    #[error("error-registrar-uaa-6 Updating client registration failed ({}): {detail}", fmt_status(.status))]
    UpdateClient {
        status: Option<StatusCode>,
        detail: String,
    },

    /// Error when updating the client secret fails
    #[error("error-registrar-uaa-7 Updating client secret failed ({}): {detail}", fmt_status(.status))]
    UpdateSecret {
        status: Option<StatusCode>,
        detail: String,
    },
}

fn fmt_status(status: &Option<StatusCode>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "transport failure".to_string(),
    }
}
