use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Resolver configuration file. Reparsed only at startup or explicit
    /// reload, never per query. A `resolv.conf` inside the zone conf dir
    /// takes precedence.
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            resolv_conf: default_resolv_conf(),
        }
    }
}
