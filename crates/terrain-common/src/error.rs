//! Error types for the terrain tile services.

use thiserror::Error;

use crate::tile::TileCoord;

/// Result type alias using TerrainError.
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Primary error type for tile and tileset operations.
#[derive(Debug, Error)]
pub enum TerrainError {
    // === Request Errors ===
    #[error("Invalid {component} coordinate: '{value}'")]
    MalformedCoordinate {
        component: &'static str,
        value: String,
    },

    #[error("Invalid tileset name: '{0}'")]
    InvalidTileset(String),

    // === Lookup Errors ===
    #[error("The terrain tile does not exist")]
    TileNotFound { tileset: String, coord: TileCoord },

    #[error("The tileset `{0}` does not exist")]
    TilesetNotFound(String),

    // === Backend Errors ===
    #[error("{store} store error: {message}")]
    Backend {
        store: &'static str,
        message: String,
    },

    #[error("{store} store timed out after {after_ms}ms")]
    Timeout { store: &'static str, after_ms: u64 },

    #[error("Blank placeholder tile unavailable: {0}")]
    PlaceholderUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TerrainError {
    /// Build a backend error for the named store.
    pub fn backend(store: &'static str, message: impl Into<String>) -> Self {
        TerrainError::Backend {
            store,
            message: message.into(),
        }
    }

    /// True for faults raised by a storage tier (as opposed to lookups that
    /// legitimately found nothing).
    pub fn is_backend_fault(&self) -> bool {
        matches!(
            self,
            TerrainError::Backend { .. } | TerrainError::Timeout { .. }
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TerrainError::MalformedCoordinate { .. } | TerrainError::InvalidTileset(_) => 400,

            TerrainError::TileNotFound { .. } | TerrainError::TilesetNotFound(_) => 404,

            TerrainError::Timeout { .. } => 504,

            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let malformed = TerrainError::MalformedCoordinate {
            component: "z",
            value: "abc".to_string(),
        };
        assert_eq!(malformed.http_status_code(), 400);

        let missing = TerrainError::TileNotFound {
            tileset: "world".to_string(),
            coord: TileCoord::new(3, 5, 9),
        };
        assert_eq!(missing.http_status_code(), 404);
        assert_eq!(missing.to_string(), "The terrain tile does not exist");

        assert_eq!(TerrainError::backend("redis", "boom").http_status_code(), 500);
        assert_eq!(
            TerrainError::Timeout {
                store: "redis",
                after_ms: 50
            }
            .http_status_code(),
            504
        );
    }

    #[test]
    fn test_backend_fault_classification() {
        assert!(TerrainError::backend("file", "permission denied").is_backend_fault());
        assert!(!TerrainError::TilesetNotFound("world".to_string()).is_backend_fault());
    }
}
