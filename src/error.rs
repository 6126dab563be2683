use std::io;
use std::net::SocketAddr;

/// Errors surfaced while starting or running the liveness server.
///
/// Request handling itself is infallible, so every variant here is fatal to
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// Whether this error means the socket could not be acquired.
    pub fn is_bind(&self) -> bool {
        matches!(self, ServerError::Bind { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display_names_address() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:3000".parse().unwrap(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to bind server on 0.0.0.0:3000"));
        assert!(err.is_bind());
    }

    #[test]
    fn test_serve_error_is_not_bind() {
        let err = ServerError::from(io::Error::other("accept failed"));
        assert!(!err.is_bind());
        assert_eq!(err.to_string(), "Server error: accept failed");
    }
}
