//! Wire payloads for the UAA client registration endpoints.

use serde::{Deserialize, Serialize};

/// Scopes granted to the firehose consumer client.
pub const FIREHOSE_SCOPE: [&str; 3] = ["openid", "oauth.approvals", "doppler.firehose"];

/// Grant types the firehose consumer client may use.
pub const FIREHOSE_GRANT_TYPES: [&str; 1] = ["client_credentials"];

/// Full registration payload sent when creating a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistration {
    pub client_id: String,
    pub client_secret: String,
    pub scope: Vec<String>,
    pub authorized_grant_types: Vec<String>,
}

impl ClientRegistration {
    /// Registration payload for the firehose consumer with the fixed
    /// scope and grant-type sets.
    pub fn firehose(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: FIREHOSE_SCOPE.iter().map(|s| s.to_string()).collect(),
            authorized_grant_types: FIREHOSE_GRANT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Metadata-only payload sent when updating an existing client.
///
/// Deliberately has no secret field; UAA rotates secrets through a dedicated
/// endpoint and rejects secrets smuggled into the update call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub client_id: String,
    pub scope: Vec<String>,
    pub authorized_grant_types: Vec<String>,
}

impl ClientUpdate {
    /// Update payload for the firehose consumer with the fixed scope and
    /// grant-type sets.
    pub fn firehose(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            scope: FIREHOSE_SCOPE.iter().map(|s| s.to_string()).collect(),
            authorized_grant_types: FIREHOSE_GRANT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Payload for the client secret endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretUpdate {
    pub secret: String,
}
