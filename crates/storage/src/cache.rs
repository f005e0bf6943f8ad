//! Redis-backed distributed tile cache.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{
    aio::{ConnectionLike, MultiplexedConnection},
    AsyncCommands, Client,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

use terrain_common::{TerrainError, TerrainResult, Tile, TileCoord};

use crate::store::TileStore;

/// Redis tile cache client.
///
/// The connection is cloned per command; with a multiplexed connection,
/// concurrent requests share one socket without locking.
pub struct RedisStore<C = MultiplexedConnection> {
    conn: C,
    ttl: Option<Duration>,
}

impl<C> RedisStore<C> {
    /// Wrap an established connection.
    pub fn with_connection(conn: C, ttl: Option<Duration>) -> Self {
        Self { conn, ttl }
    }
}

impl RedisStore {
    /// Connect to Redis.
    ///
    /// `ttl` of `None` stores tiles without expiry.
    pub async fn connect(redis_url: &str, ttl: Option<Duration>) -> TerrainResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| TerrainError::backend("redis", format!("Invalid Redis URL: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                TerrainError::backend("redis", format!("Redis connection failed: {}", e))
            })?;

        info!(url = %redacted_url(redis_url), ttl_secs = ?ttl.map(|t| t.as_secs()), "Connected to Redis tile cache");

        Ok(Self::with_connection(conn, ttl))
    }
}

#[async_trait]
impl<C> TileStore for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "redis"
    }

    #[instrument(skip(self), fields(tileset = %tileset, coord = %coord))]
    async fn load(&self, tileset: &str, coord: TileCoord) -> TerrainResult<Option<Bytes>> {
        let key = CacheKey::new(tileset, coord).to_string();
        let mut conn = self.conn.clone();

        let result: Option<Vec<u8>> = conn
            .get(&key)
            .await
            .map_err(|e| TerrainError::backend(self.name(), format!("Cache get failed: {}", e)))?;

        match result {
            Some(data) => {
                debug!(key = %key, size = data.len(), "Cache hit");
                Ok(Some(Bytes::from(data)))
            }
            None => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, tile), fields(tileset = %tileset, coord = %tile.coord))]
    async fn save(&self, tileset: &str, tile: &Tile) -> TerrainResult<()> {
        let key = CacheKey::new(tileset, tile.coord).to_string();
        let mut conn = self.conn.clone();

        let data: &[u8] = tile.data.as_ref();
        let result: redis::RedisResult<()> = match self.ttl {
            Some(ttl) => conn.set_ex(&key, data, ttl.as_secs()).await,
            None => conn.set(&key, data).await,
        };
        result
            .map_err(|e| TerrainError::backend(self.name(), format!("Cache set failed: {}", e)))?;

        debug!(key = %key, size = tile.data.len(), "Cached tile");
        Ok(())
    }
}

/// Cache key for terrain tiles: `{tileset}/{z}/{x}/{y}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tileset: String,
    pub coord: TileCoord,
}

impl CacheKey {
    pub fn new(tileset: impl Into<String>, coord: TileCoord) -> Self {
        Self {
            tileset: tileset.into(),
            coord,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.tileset, self.coord.z, self.coord.x, self.coord.y
        )
    }
}

/// Strip credentials from a connection URL before it is logged.
pub fn redacted_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => url.to_string(),
    }
}
