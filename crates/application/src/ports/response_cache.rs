use bytes::Bytes;
use relay_dns_domain::{DomainError, QueryKey};

/// Outcome of a cache read. A stale hit still carries the message; the
/// caller decides whether to serve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Stale,
    Miss,
}

#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub message: Option<Bytes>,
    pub status: CacheStatus,
}

impl CacheLookup {
    pub fn miss() -> Self {
        Self {
            message: None,
            status: CacheStatus::Miss,
        }
    }
}

/// TTL-aware response cache keyed by the canonical question string.
///
/// Implementations must be safe for concurrent get/set without external
/// locking. Malformed stored entries are absorbed as misses, never surfaced.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &QueryKey) -> CacheLookup;

    /// Store a wire-serialized answer under the key; expiry is computed by
    /// the implementation from its configured TTL.
    fn set(&self, key: &QueryKey, message: &[u8]) -> Result<(), DomainError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
