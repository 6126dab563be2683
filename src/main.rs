//! keepalive: answers `GET /` so uptime monitors see this host as alive.
//!
//! This is the application entry point. It initializes tracing, resolves the
//! listening port from the environment, binds the server and runs it until a
//! shutdown signal arrives.

use clap::Parser;

use keepalive::config::{LogFormat, LOG_FORMAT_ENV_VAR};
use keepalive::http::setup_shutdown_handler;
use keepalive::{logging, start_server, ServerConfig};

/// keepalive: an HTTP liveness endpoint
///
/// Configured through the environment: PORT (default 3000), RUST_LOG and
/// LOG_FORMAT (text or json).
#[derive(Parser, Debug)]
#[command(name = "keepalive", version, about)]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _args = Args::parse();

    let (log_format, rejected_format) = LogFormat::from_env();
    logging::init(log_format)?;

    if let Some(value) = rejected_format {
        tracing::warn!(
            value = %value,
            "Ignoring invalid {} value, using text",
            LOG_FORMAT_ENV_VAR
        );
    }

    let config = ServerConfig::from_env();
    tracing::debug!(addr = %config.socket_addr(), "Resolved listener configuration");

    let server = start_server(&config)?;
    setup_shutdown_handler(server.server_handle());

    server.wait().await?;

    Ok(())
}
