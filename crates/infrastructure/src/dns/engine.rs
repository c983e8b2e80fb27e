//! Resolution engine: consults the local zone store first (chasing local
//! CNAMEs with a depth bound), then the response cache, then the upstream
//! resolver.
//!
//! Cache and zone errors are absorbed here; only `ResolutionFailed` and
//! `CnameLoop` surface to the request handler, which answers the client with
//! a protocol-level failure instead of silence.

use crate::dns::zone::{ZoneLookup, ZoneStore};
use bytes::Bytes;
use hickory_proto::op::{Header, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, Record, RecordType};
use relay_dns_application::ports::{CacheStatus, ResponseCache, UpstreamResolver};
use relay_dns_domain::{DnsProtocol, DomainError, QueryKey};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// CNAME chase depth bound, shared across the recursive invocations for one
/// original request.
const MAX_CNAME_DEPTH: u8 = 5;

pub struct ResolutionEngine {
    zones: Arc<ZoneStore>,
    cache: Arc<dyn ResponseCache>,
    upstream: Arc<dyn UpstreamResolver>,
}

impl ResolutionEngine {
    pub fn new(
        zones: Arc<ZoneStore>,
        cache: Arc<dyn ResponseCache>,
        upstream: Arc<dyn UpstreamResolver>,
    ) -> Self {
        Self {
            zones,
            cache,
            upstream,
        }
    }

    /// Resolve one decoded query to a response message. The terminal states
    /// are answered (`Ok`) and failed (`Err`); the caller must turn `Err`
    /// into a protocol-level failure response.
    pub async fn resolve(
        &self,
        protocol: DnsProtocol,
        request: &Message,
    ) -> Result<Message, DomainError> {
        self.resolve_at_depth(protocol, request, 0).await
    }

    /// Depth is passed explicitly through every recursive invocation; the
    /// call stack is never the implicit bound.
    fn resolve_at_depth<'a>(
        &'a self,
        protocol: DnsProtocol,
        request: &'a Message,
        depth: u8,
    ) -> Pin<Box<dyn Future<Output = Result<Message, DomainError>> + Send + 'a>> {
        Box::pin(async move {
            let query = request
                .queries()
                .first()
                .ok_or(DomainError::EmptyQuestion)?;
            let key = QueryKey::new(
                query.name().to_utf8(),
                query.query_class().into(),
                query.query_type().into(),
            );

            if depth > MAX_CNAME_DEPTH {
                return Err(DomainError::CnameLoop {
                    qname: key.name.clone(),
                });
            }

            match self.zones.lookup(&key) {
                ZoneLookup::Records(records) => {
                    debug!(name = %key.name, rtype = key.rtype, "Resolved from local zone");
                    Ok(local_reply(request, records))
                }
                ZoneLookup::Cname { record, target } => {
                    self.chase_cname(protocol, request, record, target, depth)
                        .await
                }
                ZoneLookup::Bypass => {
                    debug!(name = %key.name, rtype = key.rtype, "Bypass marker, resolving upstream");
                    self.resolve_upstream(protocol, request, &key).await
                }
                ZoneLookup::Miss => self.resolve_upstream(protocol, request, &key).await,
            }
        })
    }

    /// Chase a locally configured CNAME as a fresh IN/A query through the
    /// full engine, appending the resolved answers after the CNAME itself.
    async fn chase_cname(
        &self,
        protocol: DnsProtocol,
        request: &Message,
        record: Record,
        target: Name,
        depth: u8,
    ) -> Result<Message, DomainError> {
        debug!(target = %target, depth = depth, "Chasing local CNAME");

        let mut chase_query = Query::new();
        chase_query.set_name(target);
        chase_query.set_query_type(RecordType::A);
        chase_query.set_query_class(DNSClass::IN);

        let mut chase = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        chase.set_recursion_desired(true);
        chase.add_query(chase_query);

        let chased = self.resolve_at_depth(protocol, &chase, depth + 1).await?;

        let mut records = vec![record];
        records.extend(chased.answers().iter().cloned());
        Ok(local_reply(request, records))
    }

    async fn resolve_upstream(
        &self,
        protocol: DnsProtocol,
        request: &Message,
        key: &QueryKey,
    ) -> Result<Message, DomainError> {
        let lookup = self.cache.get(key);
        if lookup.status == CacheStatus::Fresh {
            if let Some(message) = &lookup.message {
                if let Ok(cached) = reply_from_wire(message, request.id()) {
                    debug!(key = %key.cache_key(), "Fresh cache hit");
                    return Ok(cached);
                }
            }
        }
        let stale = match lookup.status {
            CacheStatus::Stale => lookup.message,
            _ => None,
        };

        let query_bytes = Bytes::from(
            request
                .to_vec()
                .map_err(|e| DomainError::Proto(e.to_string()))?,
        );

        match self.upstream.lookup(protocol, query_bytes).await {
            Ok(answer) => {
                if let Err(e) = self.cache.set(key, &answer) {
                    warn!(key = %key.cache_key(), error = %e, "Failed to cache upstream answer");
                }
                reply_from_wire(&answer, request.id())
            }
            Err(upstream_err) => {
                // Stale-on-failure: a cached answer past its TTL beats no
                // answer at all.
                if let Some(message) = stale {
                    if let Ok(cached) = reply_from_wire(&message, request.id()) {
                        warn!(
                            key = %key.cache_key(),
                            error = %upstream_err,
                            "Upstream failed, serving stale cached answer"
                        );
                        return Ok(cached);
                    }
                }
                Err(upstream_err)
            }
        }
    }
}

/// Reply for a locally answered query: echo the question, flag the response,
/// carry the request's transaction ID.
fn local_reply(request: &Message, records: Vec<Record>) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    if let Some(query) = request.queries().first() {
        response.add_query(query.clone());
    }
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.set_authoritative(true);
    response.add_answers(records);
    response
}

fn reply_from_wire(message: &Bytes, id: u16) -> Result<Message, DomainError> {
    let mut parsed = Message::from_vec(message).map_err(|e| DomainError::Proto(e.to_string()))?;
    let mut header: Header = *parsed;
    header.set_id(id);
    parsed.set_header(header);
    Ok(parsed)
}
