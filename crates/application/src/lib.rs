//! Relay DNS Application Layer
//!
//! Ports (traits) crossed by the resolution path and the thin use cases the
//! HTTP surface drives. Wire messages cross ports as opaque [`bytes::Bytes`];
//! only the infrastructure layer speaks hickory types.

pub mod ports;
pub mod use_cases;

pub use ports::{CacheLookup, CacheStatus, ResponseCache, StatsSource, UpstreamResolver, ZoneReloader};
pub use use_cases::{GetServerStatsUseCase, ReloadZonesUseCase};
