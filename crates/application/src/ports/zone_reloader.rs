use async_trait::async_trait;
use relay_dns_domain::{DomainError, ZoneDiff};

/// Rebuilds the zone table from configuration files and publishes it
/// atomically; concurrent readers keep answering from the previous table
/// until the swap.
#[async_trait]
pub trait ZoneReloader: Send + Sync {
    async fn reload(&self) -> Result<ZoneDiff, DomainError>;
}
