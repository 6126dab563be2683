//! HTTP server module.
//!
//! Provides:
//! - Binding the liveness listener and serving the router
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{start_server, ListeningHandle};
pub use shutdown::setup_shutdown_handler;
