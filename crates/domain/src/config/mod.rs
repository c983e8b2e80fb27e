//! Configuration structures organized by concern:
//! - `root`: main configuration and CLI overrides
//! - `server`: listen addresses
//! - `cache`: response cache sizing and TTL
//! - `zone`: local zone file directory
//! - `upstream`: resolver configuration source
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod cache;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod upstream;
pub mod zone;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
pub use zone::ZoneConfig;
