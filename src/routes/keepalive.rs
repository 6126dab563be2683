//! Keep-alive endpoint polled by external uptime monitors.
//!
//! The handler only proves the process can answer HTTP. It inspects nothing
//! from the request and touches no state.

use crate::config::KEEPALIVE_MESSAGE;

/// Keep-alive handler.
///
/// Returns the fixed confirmation string as `text/plain; charset=utf-8`.
pub async fn index() -> &'static str {
    KEEPALIVE_MESSAGE
}
