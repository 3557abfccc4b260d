//! HTTP routes for the selfsign server.

pub mod sign;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// Creates the main router with all routes mounted.
pub fn create_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .merge(sign::router(pipeline))
        .layer(TraceLayer::new_for_http())
}
