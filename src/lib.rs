//! keepalive - an HTTP liveness endpoint
//!
//! Binds a TCP port and answers `GET /` with a fixed confirmation string, so
//! an external uptime monitor can see that the host process is alive.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;

pub use config::{parse_port, ServerConfig};
pub use error::ServerError;
pub use http::{start_server, ListeningHandle};
