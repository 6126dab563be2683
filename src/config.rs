//! Configuration loading and constants.
//!
//! Everything is read from the process environment: `PORT` selects the
//! listening port, `RUST_LOG` and `LOG_FORMAT` control logging. `ServerConfig`
//! is the resolved listener configuration handed to `http::start_server`.

use std::env::VarError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use const_format::formatcp;

// =============================================================================
// Liveness Response
// =============================================================================

/// Body returned by `GET /`
pub const KEEPALIVE_MESSAGE: &str = "✅ Bot is running – keep-alive OK";

/// Liveness answers must never be served from an intermediate cache
pub const CACHE_CONTROL_KEEPALIVE: &str = "no-store";

// =============================================================================
// Listener Defaults
// =============================================================================

/// Port used when `PORT` is absent or unusable
pub const DEFAULT_PORT: u16 = 3000;

/// Bind on all interfaces
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Environment variable holding the listening port
pub const PORT_ENV_VAR: &str = "PORT";

/// Seconds to wait for in-flight connections after a shutdown request
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

// =============================================================================
// Logging Defaults
// =============================================================================

/// Environment variable selecting the log format (text or json)
pub const LOG_FORMAT_ENV_VAR: &str = "LOG_FORMAT";

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info", CRATE_NAME);

/// Target of the startup line, which RUST_LOG cannot filter out
pub const STARTUP_LOG_TARGET: &str = formatcp!("{}::startup", CRATE_NAME);

/// Filter directive always appended to the configured filter
pub const STARTUP_LOG_DIRECTIVE: &str = formatcp!("{}=info", STARTUP_LOG_TARGET);

/// Resolve the listening port from a raw configuration value.
///
/// Absent, empty, and unparseable values all resolve to [`DEFAULT_PORT`].
/// Surrounding whitespace is ignored. `"0"` is kept and asks the OS for an
/// ephemeral port.
pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Listener configuration for the liveness server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

impl ServerConfig {
    /// Listen on all interfaces at `port`.
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST,
            port,
        }
    }

    /// Override the interface to bind.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_value(key, std::env::var(key)))
    }

    /// Load using `lookup` in place of the process environment.
    ///
    /// A present but unusable `PORT` is logged and replaced by the default
    /// rather than aborting startup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(PORT_ENV_VAR);
        let port = parse_port(raw.as_deref());

        if let Some(value) = raw.as_deref() {
            let trimmed = value.trim();
            if !trimmed.is_empty() && trimmed.parse::<u16>().is_err() {
                tracing::warn!(
                    value = %value,
                    default = DEFAULT_PORT,
                    "Ignoring invalid {} value, using default port",
                    PORT_ENV_VAR
                );
            }
        }

        Self::new(port)
    }
}

/// Flatten an environment lookup, reporting values that are not UTF-8.
fn env_value(key: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            tracing::warn!(
                value = ?raw,
                "Ignoring non UTF-8 {} value, using default",
                key
            );
            None
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the environment, falling back to text.
    ///
    /// Returns the rejected value alongside the fallback so the caller can
    /// report it once logging is up.
    pub fn from_env() -> (Self, Option<String>) {
        match std::env::var(LOG_FORMAT_ENV_VAR) {
            Ok(raw) => match raw.parse() {
                Ok(format) => (format, None),
                Err(_) => (LogFormat::Text, Some(raw)),
            },
            Err(_) => (LogFormat::Text, None),
        }
    }
}
