//! Minimal resolv.conf parsing: `nameserver` lines (dnsmasq-style
//! `host#port` accepted) and `options timeout:n`. Parsed at startup or
//! explicit reload, never per query.

use relay_dns_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

const DEFAULT_PORT: u16 = 53;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Ordered nameserver list; race order follows file order.
    pub nameservers: Vec<SocketAddr>,
    /// Shared per-attempt timeout, also used as the race stagger interval.
    pub timeout: Duration,
}

impl ResolverConfig {
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Io(format!("{} is not a readable resolv.conf: {e}", path.display()))
        })?;
        let config = Self::parse(&contents);
        if config.nameservers.is_empty() {
            warn!(file = %path.display(), "No nameservers found in resolver configuration");
        }
        Ok(config)
    }

    pub fn parse(contents: &str) -> Self {
        let mut nameservers = Vec::new();
        let mut timeout = DEFAULT_TIMEOUT;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("nameserver") => {
                    if let Some(token) = tokens.next() {
                        match parse_nameserver(token) {
                            Some(addr) => nameservers.push(addr),
                            None => warn!(server = %token, "Skipping unparseable nameserver"),
                        }
                    }
                }
                Some("options") => {
                    for option in tokens {
                        if let Some(value) = option.strip_prefix("timeout:") {
                            if let Ok(secs) = value.parse::<u64>() {
                                timeout = Duration::from_secs(secs.max(1));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            nameservers,
            timeout,
        }
    }
}

/// `1.1.1.1`, `1.1.1.1#5353` or a bare IPv6 address.
fn parse_nameserver(token: &str) -> Option<SocketAddr> {
    let (host, port) = match token.split_once('#') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (token, DEFAULT_PORT),
    };
    let ip: IpAddr = host.parse().ok()?;
    Some(SocketAddr::new(ip, port))
}
