//! TTL-aware response cache.
//!
//! Stored value layout: an 8-byte big-endian unix-millisecond expiry
//! timestamp, then the wire-serialized response message. Expiry is judged at
//! read time by comparing the stored instant against the clock; stale
//! entries are never actively deleted, only overwritten by a fresher answer
//! for the same key.

pub mod storage;

use bytes::{BufMut, Bytes, BytesMut};
use hickory_proto::op::Message;
use relay_dns_application::ports::{CacheLookup, CacheStatus, ResponseCache};
use relay_dns_domain::config::CacheConfig;
use relay_dns_domain::{DomainError, QueryKey};
use std::time::Duration;
use storage::ShardedByteCache;
use tracing::warn;

const EXPIRY_PREFIX_LEN: usize = 8;
/// Expiry prefix plus the fixed DNS header: anything shorter is corrupt.
const MIN_ENTRY_LEN: usize = EXPIRY_PREFIX_LEN + 12;

pub struct MessageCache {
    store: ShardedByteCache,
    ttl: Duration,
}

impl MessageCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            store: ShardedByteCache::new(config.shards, config.max_entries),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn now_millis() -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }

    /// Decode a stored blob; `None` means corrupt (treated as a miss by the
    /// caller, logged here).
    fn decode(key: &QueryKey, value: &Bytes) -> Option<(u64, Bytes)> {
        if value.len() < MIN_ENTRY_LEN {
            warn!(
                key = %key.cache_key(),
                len = value.len(),
                "{}",
                DomainError::MalformedCacheEntry("value shorter than expiry prefix".into())
            );
            return None;
        }
        let mut expiry_bytes = [0u8; EXPIRY_PREFIX_LEN];
        expiry_bytes.copy_from_slice(&value[..EXPIRY_PREFIX_LEN]);
        let expiry = u64::from_be_bytes(expiry_bytes);

        let message = value.slice(EXPIRY_PREFIX_LEN..);
        if let Err(e) = Message::from_vec(&message) {
            warn!(
                key = %key.cache_key(),
                "{}",
                DomainError::MalformedCacheEntry(format!("message unpack failed: {e}"))
            );
            return None;
        }
        Some((expiry, message))
    }
}

impl ResponseCache for MessageCache {
    fn get(&self, key: &QueryKey) -> CacheLookup {
        let Some(value) = self.store.get(&key.cache_key()) else {
            return CacheLookup::miss();
        };
        let Some((expiry, message)) = Self::decode(key, &value) else {
            return CacheLookup::miss();
        };

        let status = if Self::now_millis() >= expiry {
            CacheStatus::Stale
        } else {
            CacheStatus::Fresh
        };
        CacheLookup {
            message: Some(message),
            status,
        }
    }

    fn set(&self, key: &QueryKey, message: &[u8]) -> Result<(), DomainError> {
        if message.len() < MIN_ENTRY_LEN - EXPIRY_PREFIX_LEN {
            return Err(DomainError::MalformedCacheEntry(
                "refusing to cache message shorter than a DNS header".into(),
            ));
        }
        let expiry = Self::now_millis()
            + u64::try_from(self.ttl.as_millis())
                .map_err(|e| DomainError::MalformedCacheEntry(e.to_string()))?;

        let mut value = BytesMut::with_capacity(EXPIRY_PREFIX_LEN + message.len());
        value.put_u64(expiry);
        value.put_slice(message);
        self.store.set(key.cache_key(), value.freeze());
        Ok(())
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}
