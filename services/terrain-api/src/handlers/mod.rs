//! HTTP request handlers.
//!
//! - `terrain`: tile and `layer.json` handlers
//! - `health`: health check and Prometheus metrics
//! - `common`: shared response helpers

pub mod common;
pub mod health;
pub mod terrain;

pub use common::{error_response, text_response};
pub use health::{health_handler, metrics_handler, HealthResponse};
pub use terrain::{layer_handler, terrain_handler};
