//! Command line and environment configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use storage::cache::redacted_url;

/// Terrain tile server
#[derive(Parser, Debug, Clone)]
#[command(name = "terrain-api")]
#[command(about = "HTTP server for Cesium heightmap terrain tilesets")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "TERRAIN_LISTEN_ADDR")]
    pub listen: SocketAddr,

    /// Root directory under which tileset directories reside
    #[arg(short, long, default_value = ".", env = "TERRAIN_DIR")]
    pub dir: PathBuf,

    /// Redis URL for caching tiles, e.g. redis://localhost:6379
    #[arg(long, env = "REDIS_URL")]
    pub redis: Option<String>,

    /// Expiry for cached tiles in seconds (0 keeps them until evicted)
    #[arg(long, default_value_t = 0, env = "TERRAIN_CACHE_TTL_SECS")]
    pub cache_ttl_secs: u64,

    /// Per-call latency bound for each storage tier, in milliseconds
    #[arg(long, default_value_t = 5000, env = "TERRAIN_BACKEND_TIMEOUT_MS")]
    pub backend_timeout_ms: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TERRAIN_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

/// One tier of the tile store chain.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Redis cache reachable at `url`.
    Cache { url: String, ttl: Option<Duration> },
    /// Tileset directory tree rooted at `root`.
    Directory { root: PathBuf },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Cache { url, ttl } => f
                .debug_struct("Cache")
                .field("url", &redacted_url(url))
                .field("ttl", ttl)
                .finish(),
            StoreConfig::Directory { root } => {
                f.debug_struct("Directory").field("root", root).finish()
            }
        }
    }
}

/// Server configuration resolved at startup and fixed for the process.
#[derive(Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub tileset_root: PathBuf,
    pub redis_url: Option<String>,
    pub cache_ttl: Option<Duration>,
    pub backend_timeout: Duration,
}

impl ServerConfig {
    /// Store tiers in priority order: the cache, when configured, always
    /// precedes the tileset directory.
    pub fn store_chain(&self) -> Vec<StoreConfig> {
        let mut chain = Vec::with_capacity(2);

        if let Some(url) = self.redis_url.as_ref().filter(|u| !u.is_empty()) {
            chain.push(StoreConfig::Cache {
                url: url.clone(),
                ttl: self.cache_ttl,
            });
        }

        chain.push(StoreConfig::Directory {
            root: self.tileset_root.clone(),
        });
        chain
    }
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen: args.listen,
            tileset_root: args.dir.clone(),
            redis_url: args.redis.clone(),
            cache_ttl: (args.cache_ttl_secs > 0).then(|| Duration::from_secs(args.cache_ttl_secs)),
            backend_timeout: Duration::from_millis(args.backend_timeout_ms),
        }
    }
}
