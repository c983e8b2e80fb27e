pub mod cache;
pub mod engine;
pub mod health;
pub mod metrics;
pub mod server;
pub mod stats;
pub mod upstream;
pub mod zone;

pub use cache::MessageCache;
pub use engine::ResolutionEngine;
pub use health::HealthMonitor;
pub use metrics::QueryMetrics;
pub use server::DnsRequestHandler;
pub use stats::StatsCollector;
pub use upstream::RacingResolver;
pub use zone::{ZoneLookup, ZoneStore, ZoneTable};
