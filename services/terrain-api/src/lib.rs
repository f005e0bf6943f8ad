//! Terrain tile API service library.
//!
//! Serves Cesium heightmap tilesets from a chain of tile stores.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Tilesets
        .route("/tilesets/:tileset/layer.json", get(handlers::layer_handler))
        .route(
            "/tilesets/:tileset/:z/:x/:y",
            get(handlers::terrain_handler),
        )
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
