//! Shared response helpers.

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use tracing::{error, warn};

use terrain_common::TerrainError;

/// Plain-text error response for a terrain error.
///
/// Client errors carry only the short error message. Server faults are logged
/// in full and surface the store's message, which never includes connection
/// details.
pub fn error_response(err: &TerrainError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, status = status.as_u16(), "Request failed");
    } else if matches!(err, TerrainError::InvalidTileset(_)) {
        warn!(error = %err, "Rejected tileset name");
    }

    text_response(status, err.to_string())
}

/// Plain-text response with the given status.
pub fn text_response(status: StatusCode, message: impl Into<String>) -> Response {
    let mut body = message.into();
    body.push('\n');

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(body.into())
        .unwrap()
}
