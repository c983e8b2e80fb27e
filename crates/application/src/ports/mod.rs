pub mod response_cache;
pub mod stats;
pub mod upstream;
pub mod zone_reloader;

pub use response_cache::{CacheLookup, CacheStatus, ResponseCache};
pub use stats::StatsSource;
pub use upstream::UpstreamResolver;
pub use zone_reloader::ZoneReloader;
