use relay_dns_domain::{NameserverHealth, ServerStats, ZoneDiff};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DebugSnapshot {
    #[serde(flatten)]
    pub stats: ServerStats,
    pub nameservers: Vec<NameserverHealth>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub diff: ZoneDiff,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
