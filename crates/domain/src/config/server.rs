use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the DNS listeners (UDP and TCP) bind to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Address the HTTP debug/introspection endpoint binds to.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:53".to_string()
}

fn default_http_addr() -> String {
    "0.0.0.0:8666".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            http_addr: default_http_addr(),
        }
    }
}
