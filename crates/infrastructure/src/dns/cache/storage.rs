//! Sharded, size-bounded byte store underneath the message cache.
//!
//! Shards are LRU-bounded: under memory pressure the oldest entries in a
//! shard are reclaimed for new ones. Logically expired entries are NOT
//! promptly removed here; the read-time expiry check in the message cache is
//! the sole TTL mechanism.

use bytes::Bytes;
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;

pub struct ShardedByteCache {
    shards: Vec<Mutex<LruCache<String, Bytes>>>,
    mask: usize,
}

impl ShardedByteCache {
    /// `shards` is rounded up to a power of two; `max_entries` is the bound
    /// across all shards.
    pub fn new(shards: usize, max_entries: usize) -> Self {
        let shard_count = shards.next_power_of_two().max(1);
        let per_shard = NonZeroUsize::new((max_entries / shard_count).max(1))
            .unwrap_or(NonZeroUsize::MIN);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(LruCache::new(per_shard)))
            .collect();
        Self {
            shards,
            mask: shard_count - 1,
        }
    }

    fn shard(&self, key: &str) -> &Mutex<LruCache<String, Bytes>> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize & self.mask]
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let mut shard = match self.shard(key).lock() {
            Ok(shard) => shard,
            Err(poisoned) => poisoned.into_inner(),
        };
        shard.get(key).cloned()
    }

    pub fn set(&self, key: String, value: Bytes) {
        let mut shard = match self.shard(&key).lock() {
            Ok(shard) => shard,
            Err(poisoned) => poisoned.into_inner(),
        };
        shard.put(key, value);
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| match shard.lock() {
                Ok(shard) => shard.len(),
                Err(poisoned) => poisoned.into_inner().len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
