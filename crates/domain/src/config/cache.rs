use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Seconds an upstream answer stays fresh.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Number of cache shards (rounded up to a power of two).
    #[serde(default = "default_shards")]
    pub shards: usize,

    /// Upper bound on stored entries across all shards. Oldest entries are
    /// evicted under pressure; logically expired entries are only judged at
    /// read time.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_ttl_secs() -> u64 {
    30
}

fn default_shards() -> usize {
    128
}

fn default_max_entries() -> usize {
    262_144
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            shards: default_shards(),
            max_entries: default_max_entries(),
        }
    }
}
