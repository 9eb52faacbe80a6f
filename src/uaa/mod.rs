//! UAA client registration reconciliation for the firehose consumer.

pub mod registrar;
pub mod token;
pub mod types;

// Re-export frequently used items from each module
pub use registrar::UaaRegistrar;
pub use token::{TokenRefresher, UaaTokenRefresher};
pub use types::{
    ClientRegistration, ClientUpdate, SecretUpdate, FIREHOSE_GRANT_TYPES, FIREHOSE_SCOPE,
};
