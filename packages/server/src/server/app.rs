//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::domains::matching::{DiscoveryEngine, MatchEngine};
use crate::kernel::ServerDeps;
use crate::server::routes::{discover_handler, health_handler, swipe_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub match_engine: Arc<MatchEngine>,
    pub discovery_engine: Arc<DiscoveryEngine>,
}

/// Build the application router.
///
/// The HTTP surface is deliberately thin: handlers decode input, call the
/// engines, and map the error taxonomy to status codes. Authentication and
/// request validation frameworks live outside this core.
pub fn build_app(deps: ServerDeps) -> Router {
    let state = AppState {
        match_engine: Arc::new(MatchEngine::new(&deps)),
        discovery_engine: Arc::new(DiscoveryEngine::new(&deps)),
        deps,
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/swipe", post(swipe_handler))
        .route("/api/discover", get(discover_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
