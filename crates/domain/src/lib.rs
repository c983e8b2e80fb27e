//! Relay DNS Domain Layer

pub mod config;
pub mod errors;
pub mod protocol;
pub mod query_key;
pub mod stats;
pub mod zone_diff;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use protocol::DnsProtocol;
pub use query_key::QueryKey;
pub use stats::{NameserverHealth, ServerStats};
pub use zone_diff::ZoneDiff;
