use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ZoneConfig {
    /// Directory scanned for `*.dns-conf` zone files. A `resolv.conf` found
    /// in the same tree overrides the system resolver configuration.
    #[serde(default)]
    pub conf_dir: String,
}
