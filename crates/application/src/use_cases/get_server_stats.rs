use crate::ports::StatsSource;
use relay_dns_domain::{NameserverHealth, ServerStats};
use std::sync::Arc;

/// Snapshot of zone-table size, cache size and throughput for the debug
/// endpoint.
pub struct GetServerStatsUseCase {
    source: Arc<dyn StatsSource>,
}

impl GetServerStatsUseCase {
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self { source }
    }

    pub fn execute(&self) -> ServerStats {
        self.source.server_stats()
    }

    pub fn nameserver_health(&self) -> Vec<NameserverHealth> {
        self.source.nameserver_health()
    }
}
