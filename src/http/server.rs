//! Liveness server startup logic.
//!
//! The listening socket is bound synchronously so that a bind failure reaches
//! the caller before anything is served. Serving then runs on a spawned task
//! driven by an axum-server `Handle`.

use std::fmt;
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use tokio::task::JoinHandle;

use crate::config::{ServerConfig, SHUTDOWN_GRACE_PERIOD_SECS, STARTUP_LOG_TARGET};
use crate::error::ServerError;
use crate::routes::create_router;

/// A bound and serving liveness server.
///
/// Dropping the handle does not stop the server; call [`shutdown`] and then
/// [`wait`] to drain it.
///
/// [`shutdown`]: ListeningHandle::shutdown
/// [`wait`]: ListeningHandle::wait
pub struct ListeningHandle {
    local_addr: SocketAddr,
    handle: Handle,
    task: JoinHandle<std::io::Result<()>>,
}

impl fmt::Debug for ListeningHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListeningHandle")
            .field("local_addr", &self.local_addr)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl ListeningHandle {
    /// The address actually bound (resolves port 0 to the assigned port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The axum-server handle, for wiring signal-driven shutdown.
    pub fn server_handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Stop accepting connections and drain in-flight ones.
    pub fn shutdown(&self) {
        self.handle
            .graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)));
    }

    /// Wait for the server task to finish.
    ///
    /// Without a prior shutdown this resolves only if serving fails.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.task.await??;
        tracing::info!(addr = %self.local_addr, "Keep-alive server stopped");
        Ok(())
    }
}

/// Bind the configured address and start serving the keep-alive router.
///
/// Must be called from within a Tokio runtime.
pub fn start_server(config: &ServerConfig) -> Result<ListeningHandle, ServerError> {
    serve_router(create_router(), config)
}

fn serve_router(app: Router, config: &ServerConfig) -> Result<ListeningHandle, ServerError> {
    let addr = config.socket_addr();
    let bind_error = |source| ServerError::Bind { addr, source };

    let listener = TcpListener::bind(addr).map_err(bind_error)?;
    listener.set_nonblocking(true).map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(
        target: STARTUP_LOG_TARGET,
        port = local_addr.port(),
        "✅ Keep-alive server active on port {}",
        local_addr.port()
    );

    let handle = Handle::new();
    let server = axum_server::from_tcp(listener)
        .handle(handle.clone())
        .serve(app.into_make_service());

    let task = tokio::spawn(async move {
        let result = server.await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Keep-alive server failed");
        }
        result
    });

    Ok(ListeningHandle {
        local_addr,
        handle,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::CapturedLogs;
    use std::net::{IpAddr, Ipv4Addr};

    fn loopback(port: u16) -> ServerConfig {
        ServerConfig::new(port).with_host(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }

    #[tokio::test]
    async fn test_ephemeral_port_is_resolved() {
        let server = start_server(&loopback(0)).unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert!(server.local_addr().ip().is_loopback());

        server.shutdown();
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_startup_line_reports_bound_port() {
        let logs = CapturedLogs::default();
        let _guard = logs.install("warn");

        let server = start_server(&loopback(0)).unwrap();
        let port = server.local_addr().port();

        let output = logs.contents();
        assert!(output.contains(&format!("Keep-alive server active on port {}", port)));
        assert_eq!(output.matches("Keep-alive server active").count(), 1);

        server.shutdown();
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_bind_logs_no_startup_line() {
        let first = start_server(&loopback(0)).unwrap();
        let port = first.local_addr().port();

        let logs = CapturedLogs::default();
        let _guard = logs.install("warn");
        assert!(start_server(&loopback(port)).is_err());
        assert!(!logs.contents().contains("Keep-alive server active"));

        first.shutdown();
        first.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_second_bind_on_same_port_fails() {
        let first = start_server(&loopback(0)).unwrap();
        let port = first.local_addr().port();

        let err = start_server(&loopback(port)).unwrap_err();
        assert!(err.is_bind());
        match err {
            ServerError::Bind { addr, source } => {
                assert_eq!(addr.port(), port);
                assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
            }
            other => panic!("expected bind error, got {other:?}"),
        }

        first.shutdown();
        first.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_releases_port() {
        let server = start_server(&loopback(0)).unwrap();
        let addr = server.local_addr();

        server.shutdown();
        server.wait().await.unwrap();

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
