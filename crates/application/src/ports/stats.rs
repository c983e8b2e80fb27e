use relay_dns_domain::{NameserverHealth, ServerStats};

/// Read-only observability snapshot, off the resolution path.
pub trait StatsSource: Send + Sync {
    fn server_stats(&self) -> ServerStats;

    fn nameserver_health(&self) -> Vec<NameserverHealth>;
}
