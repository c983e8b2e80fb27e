//! Upstream racing resolver.
//!
//! Attempts are started against the configured nameservers top-down, one new
//! attempt per stagger interval (= the shared timeout), and the first usable
//! answer wins. Attempts coordinate only through a capacity-1 result slot
//! written with a non-blocking send; losers' answers are silently dropped.
//! There is no cancellation: abandoned attempts run to completion and cannot
//! affect later lookups.

pub mod exchange;
pub mod resolv_conf;

use async_trait::async_trait;
use bytes::Bytes;
use hickory_proto::op::{Message, ResponseCode};
use relay_dns_application::ports::UpstreamResolver;
use relay_dns_domain::{DnsProtocol, DomainError};
use resolv_conf::ResolverConfig;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

pub struct RacingResolver {
    nameservers: Vec<SocketAddr>,
    timeout: Duration,
}

impl RacingResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            nameservers: config.nameservers,
            timeout: config.timeout,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        Ok(Self::new(ResolverConfig::from_file(path)?))
    }

    pub fn nameserver_list(&self) -> &[SocketAddr] {
        &self.nameservers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn resolution_failed(&self, qname: String, protocol: DnsProtocol) -> DomainError {
        DomainError::ResolutionFailed {
            qname,
            protocol,
            nameservers: self.nameservers.iter().map(|ns| ns.to_string()).collect(),
        }
    }
}

#[async_trait]
impl UpstreamResolver for RacingResolver {
    async fn lookup(&self, protocol: DnsProtocol, query: Bytes) -> Result<Bytes, DomainError> {
        let qname = question_name(&query);

        if self.nameservers.is_empty() {
            return Err(self.resolution_failed(qname, protocol));
        }

        // Capacity-1 slot: first usable answer wins, later writers drop.
        let (tx, mut rx) = mpsc::channel::<Bytes>(1);
        let mut handles = Vec::with_capacity(self.nameservers.len());

        let mut stagger = tokio::time::interval(self.timeout);
        stagger.set_missed_tick_behavior(MissedTickBehavior::Delay);
        stagger.tick().await; // first tick completes immediately

        for &server in &self.nameservers {
            handles.push(tokio::spawn(attempt(
                protocol,
                server,
                query.clone(),
                self.timeout,
                tx.clone(),
                qname.clone(),
            )));

            tokio::select! {
                biased;
                Some(answer) = rx.recv() => return Ok(answer),
                _ = stagger.tick() => {}
            }
        }

        // Every server has been started; wait for the stragglers, then make
        // one final non-blocking check of the slot.
        for handle in handles {
            let _ = handle.await;
        }
        match rx.try_recv() {
            Ok(answer) => Ok(answer),
            Err(_) => Err(self.resolution_failed(qname, protocol)),
        }
    }

    fn nameservers(&self) -> Vec<String> {
        self.nameservers.iter().map(|ns| ns.to_string()).collect()
    }
}

/// One fire-and-forget attempt against a single nameserver. A transport
/// error or SERVFAIL drops silently, leaving the race to other servers;
/// every other response, including definitive negatives like NXDOMAIN,
/// is offered to the result slot.
async fn attempt(
    protocol: DnsProtocol,
    server: SocketAddr,
    query: Bytes,
    timeout: Duration,
    tx: mpsc::Sender<Bytes>,
    qname: String,
) {
    let response = match exchange::exchange(protocol, server, &query, timeout).await {
        Ok(response) => response,
        Err(e) => {
            debug!(qname = %qname, server = %server, error = %e, "Socket error, attempt dropped");
            return;
        }
    };

    match Message::from_vec(&response) {
        Ok(message) => {
            let rcode = message.response_code();
            if rcode == ResponseCode::ServFail {
                debug!(qname = %qname, server = %server, "Server failure, trying other upstreams");
                return;
            }
            if rcode != ResponseCode::NoError {
                // A verified negative answer; asking other resolvers would
                // make no sense.
                debug!(qname = %qname, server = %server, rcode = ?rcode, "Definitive non-success answer");
            } else {
                debug!(qname = %qname, server = %server, protocol = %protocol, "Resolved upstream");
            }
        }
        Err(e) => {
            debug!(qname = %qname, server = %server, error = %e, "Undecodable response, attempt dropped");
            return;
        }
    }

    let _ = tx.try_send(response);
}

fn question_name(query: &Bytes) -> String {
    Message::from_vec(query)
        .ok()
        .and_then(|m| m.queries().first().map(|q| q.name().to_utf8()))
        .unwrap_or_default()
}
