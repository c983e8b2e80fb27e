use serde::{Deserialize, Serialize};

/// Read-only snapshot served by the debug endpoint. Not part of the
/// resolution path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub zone_records: usize,
    pub cache_entries: usize,
    pub queries_total: u64,
    pub qps: f64,
}

/// Last observed probe status for one upstream nameserver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameserverHealth {
    pub server: String,
    pub sent: u64,
    pub received: u64,
    pub loss_pct: f64,
    pub avg_rtt_ms: u64,
    /// RFC 3339 timestamp of the last completed probe, if any.
    pub last_probe: Option<String>,
}
