use crate::protocol::DnsProtocol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// No configured nameserver produced a usable answer within the race.
    #[error("{} resolv failed on {} ({})", qname, nameservers.join("; "), protocol)]
    ResolutionFailed {
        qname: String,
        protocol: DnsProtocol,
        nameservers: Vec<String>,
    },

    /// CNAME chase exceeded the depth bound.
    #[error("CNAME loop detected while resolving {qname}")]
    CnameLoop { qname: String },

    /// Corrupt bytes in the response cache. Absorbed as a miss, never fatal.
    #[error("Malformed cache entry: {0}")]
    MalformedCacheEntry(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("DNS protocol error: {0}")]
    Proto(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Query timeout")]
    Timeout,

    #[error("Query has no question section")]
    EmptyQuestion,
}
