use async_trait::async_trait;
use bytes::Bytes;
use relay_dns_domain::{DnsProtocol, DomainError};

/// Forwarding resolver racing a query against the configured nameservers.
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    /// Returns the first usable wire-format answer, or
    /// [`DomainError::ResolutionFailed`] naming every server attempted.
    async fn lookup(&self, protocol: DnsProtocol, query: Bytes) -> Result<Bytes, DomainError>;

    /// Ordered nameserver list, for diagnostics.
    fn nameservers(&self) -> Vec<String>;
}
