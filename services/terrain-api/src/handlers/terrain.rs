//! Terrain tile and tileset manifest handlers.

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::Response,
};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, instrument};

use storage::Origin;
use terrain_common::{validate_tileset, TerrainError, TileCoord, TILE_EXTENSION};

use super::common::{error_response, text_response};
use crate::state::AppState;

/// GET /tilesets/:tileset/:z/:x/:y.terrain
#[instrument(skip(state))]
pub async fn terrain_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((tileset, z, x, y_file)): Path<(String, String, String, String)>,
) -> Response {
    let Some(y) = y_file
        .strip_suffix(TILE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
    else {
        record_request("404");
        return text_response(StatusCode::NOT_FOUND, "Not Found");
    };

    let parsed = validate_tileset(&tileset).and_then(|_| TileCoord::parse(&z, &x, y));
    let coord = match parsed {
        Ok(coord) => coord,
        Err(e) => {
            record_request("400");
            return error_response(&e);
        }
    };

    let resolution = match state.tiles.resolve(&tileset, coord).await {
        Ok(resolution) => resolution,
        Err(e) => {
            record_request(status_label(&e));
            if e.is_backend_fault() {
                counter!("terrain_tile_backend_faults_total").increment(1);
            } else if let TerrainError::TileNotFound { .. } = e {
                debug!(tileset = %tileset, coord = %coord, "Tile not found");
            }
            return error_response(&e);
        }
    };

    // The backfill task, if any, keeps running after this handle is dropped.
    drop(resolution.backfill);

    record_request("200");
    let cache_status = match resolution.origin {
        Origin::Tier(0) => "HIT",
        Origin::Tier(_) => "MISS",
        Origin::Placeholder => "PLACEHOLDER",
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_ENCODING, "gzip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment;filename={}", resolution.tile.filename()),
        )
        .header("X-Cache", cache_status)
        .body(resolution.tile.data.into())
        .unwrap()
}

/// GET /tilesets/:tileset/layer.json
#[instrument(skip(state))]
pub async fn layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(tileset): Path<String>,
) -> Response {
    let body = match state
        .manifests
        .load(&tileset)
        .await
        .and_then(|manifest| manifest.to_bytes())
    {
        Ok(body) => body,
        Err(e) => return error_response(&e),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn record_request(status: &'static str) {
    counter!("terrain_tile_requests_total", "status" => status).increment(1);
}

fn status_label(err: &TerrainError) -> &'static str {
    match err.http_status_code() {
        400 => "400",
        404 => "404",
        504 => "504",
        _ => "500",
    }
}
