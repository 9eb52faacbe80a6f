//! Firehose registrar binary.
//!
//! One-shot deployment helper: loads configuration from the environment,
//! obtains a UAA auth token, and converges the firehose consumer's client
//! registration to the desired state.

use anyhow::Result;
use firehose_registrar::config::Config;
use firehose_registrar::uaa::{UaaRegistrar, UaaTokenRefresher};
use std::env;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "firehose_registrar=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = firehose_registrar::config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting firehose registrar");

    let config = Config::new()?;

    let token_refresher = UaaTokenRefresher::new(
        &config.uaa_url,
        &config.uaa_client_id,
        &config.uaa_client_secret,
        *config.skip_tls_verify.as_ref(),
        *config.http_client_timeout.as_ref(),
    )?;

    let registrar = UaaRegistrar::with_timeout(
        &config.uaa_url,
        &token_refresher,
        *config.skip_tls_verify.as_ref(),
        *config.http_client_timeout.as_ref(),
    )
    .await?;

    registrar
        .register_firehose(&config.firehose_client_id, &config.firehose_client_secret)
        .await?;

    tracing::info!(client_id = %config.firehose_client_id, "Firehose client registration up to date");

    Ok(())
}
