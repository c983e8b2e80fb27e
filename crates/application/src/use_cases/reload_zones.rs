use crate::ports::ZoneReloader;
use relay_dns_domain::{DomainError, ZoneDiff};
use std::sync::Arc;
use tracing::{info, warn};

/// Triggers a wholesale zone-table rebuild and reports what changed.
pub struct ReloadZonesUseCase {
    reloader: Arc<dyn ZoneReloader>,
}

impl ReloadZonesUseCase {
    pub fn new(reloader: Arc<dyn ZoneReloader>) -> Self {
        Self { reloader }
    }

    pub async fn execute(&self) -> Result<ZoneDiff, DomainError> {
        let diff = self.reloader.reload().await?;
        if diff.is_empty() {
            info!("Zone table reloaded, no record changes");
        } else {
            info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                changed = diff.changed.len(),
                "Zone table reloaded"
            );
        }
        if !diff.changed.is_empty() {
            warn!(records = ?diff.changed, "Changed zone records");
        }
        Ok(diff)
    }
}
