//! Nameserver health probing, used only for reporting on the debug
//! endpoint. Each configured nameserver gets a background loop sending a
//! one-question DNS probe over UDP every interval; any decoded response
//! counts as received, whatever its response code.

use crate::dns::upstream::exchange;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use relay_dns_domain::{DnsProtocol, NameserverHealth};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const PROBE_INTERVAL: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default, Clone)]
struct ProbeStats {
    sent: u64,
    received: u64,
    total_rtt: Duration,
    last_probe: Option<DateTime<Utc>>,
}

pub struct HealthMonitor {
    nameservers: Vec<SocketAddr>,
    status: DashMap<SocketAddr, ProbeStats>,
}

impl HealthMonitor {
    pub fn new(nameservers: Vec<SocketAddr>) -> Arc<Self> {
        let status = DashMap::new();
        for &ns in &nameservers {
            status.insert(ns, ProbeStats::default());
        }
        Arc::new(Self {
            nameservers,
            status,
        })
    }

    /// One background probe loop per nameserver.
    pub fn spawn(self: &Arc<Self>) {
        for &server in &self.nameservers {
            let monitor = Arc::clone(self);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(PROBE_INTERVAL);
                loop {
                    ticker.tick().await;
                    monitor.probe_once(server).await;
                }
            });
        }
    }

    async fn probe_once(&self, server: SocketAddr) {
        let query = match probe_query() {
            Ok(query) => query,
            Err(_) => return,
        };

        let started = Instant::now();
        let outcome = exchange::exchange(DnsProtocol::Udp, server, &query, PROBE_TIMEOUT).await;
        let rtt = started.elapsed();

        let mut stats = self.status.entry(server).or_default();
        stats.sent += 1;
        stats.last_probe = Some(Utc::now());
        match outcome {
            Ok(response) if Message::from_vec(&response).is_ok() => {
                stats.received += 1;
                stats.total_rtt += rtt;
                debug!(server = %server, rtt_ms = rtt.as_millis() as u64, "Nameserver probe answered");
            }
            _ => {
                debug!(server = %server, "Nameserver probe failed");
            }
        }
    }

    pub fn snapshot(&self) -> Vec<NameserverHealth> {
        self.nameservers
            .iter()
            .map(|server| {
                let stats = self
                    .status
                    .get(server)
                    .map(|s| s.clone())
                    .unwrap_or_default();
                let loss_pct = if stats.sent > 0 {
                    100.0 * (stats.sent - stats.received) as f64 / stats.sent as f64
                } else {
                    0.0
                };
                let avg_rtt_ms = if stats.received > 0 {
                    (stats.total_rtt / stats.received as u32).as_millis() as u64
                } else {
                    0
                };
                NameserverHealth {
                    server: server.to_string(),
                    sent: stats.sent,
                    received: stats.received,
                    loss_pct,
                    avg_rtt_ms,
                    last_probe: stats.last_probe.map(|t| t.to_rfc3339()),
                }
            })
            .collect()
    }
}

fn probe_query() -> Result<Vec<u8>, hickory_proto::ProtoError> {
    let mut query = Query::new();
    query.set_name(Name::root());
    query.set_query_type(RecordType::NS);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(false);
    message.add_query(query);
    message.to_vec()
}
