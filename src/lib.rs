//! UAA firehose registrar library crate.
//!
//! Reconciles the OAuth2 client-credentials registration a telemetry firehose
//! consumer needs in a UAA-compatible authorization server: the client is
//! created when absent, and its grant/scope metadata and secret are updated
//! when present.

pub mod config;
pub mod errors;
pub mod uaa;
