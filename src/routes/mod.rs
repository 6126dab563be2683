//! HTTP route table.
//!
//! A single route, `GET /`, answers the liveness probe. `HEAD /` is derived
//! from it by the router. Anything else gets the router's default 404 or 405.

pub mod keepalive;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_KEEPALIVE;
use crate::middleware::request_id_layer;

/// Creates the Axum router for the liveness server.
pub fn create_router() -> Router {
    // Keep-alive - never cached, monitors must reach the process
    let keepalive_routes = Router::new()
        .route("/", get(keepalive::index))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_KEEPALIVE),
        ));

    Router::new()
        .merge(keepalive_routes)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
