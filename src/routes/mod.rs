//! HTTP routes for the health and manual trigger surface.
//!
//! Every route is served under both `/api/health` and `/health`. Responses carry
//! `Cache-Control: no-store` so probes always see fresh data.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path prefixes the health routes are mounted under
pub const HEALTH_PREFIXES: [&str; 2] = ["/api/health", "/health"];

/// Creates the Axum router with all routes and response headers.
pub fn create_router(state: AppState) -> Router {
    let mut health_routes: Router<AppState> = Router::new();
    for prefix in HEALTH_PREFIXES {
        health_routes = health_routes
            .route(prefix, get(health::health))
            .route(&format!("{}/detailed", prefix), get(health::detailed))
            .route(&format!("{}/trigger", prefix), post(health::trigger));
    }

    let health_routes = health_routes.layer(SetResponseHeaderLayer::overriding(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    ));

    Router::new()
        .merge(health_routes)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(CorsLayer::permissive())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
