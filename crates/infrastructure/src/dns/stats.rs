use crate::dns::health::HealthMonitor;
use crate::dns::metrics::QueryMetrics;
use crate::dns::zone::ZoneStore;
use relay_dns_application::ports::{ResponseCache, StatsSource};
use relay_dns_domain::{NameserverHealth, ServerStats};
use std::sync::Arc;

/// Aggregates the observability snapshot for the debug endpoint.
pub struct StatsCollector {
    zones: Arc<ZoneStore>,
    cache: Arc<dyn ResponseCache>,
    metrics: Arc<QueryMetrics>,
    health: Arc<HealthMonitor>,
}

impl StatsCollector {
    pub fn new(
        zones: Arc<ZoneStore>,
        cache: Arc<dyn ResponseCache>,
        metrics: Arc<QueryMetrics>,
        health: Arc<HealthMonitor>,
    ) -> Self {
        Self {
            zones,
            cache,
            metrics,
            health,
        }
    }
}

impl StatsSource for StatsCollector {
    fn server_stats(&self) -> ServerStats {
        ServerStats {
            zone_records: self.zones.record_count(),
            cache_entries: self.cache.len(),
            queries_total: self.metrics.total(),
            qps: self.metrics.qps(),
        }
    }

    fn nameserver_health(&self) -> Vec<NameserverHealth> {
        self.health.snapshot()
    }
}
