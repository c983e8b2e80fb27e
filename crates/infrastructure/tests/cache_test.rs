//! Response cache TTL semantics: fresh/stale judged at read time against
//! the stored expiry prefix, corrupt entries absorbed as misses.

mod helpers;

use helpers::a_response_bytes;
use relay_dns_application::ports::{CacheStatus, ResponseCache};
use relay_dns_domain::config::CacheConfig;
use relay_dns_domain::QueryKey;
use relay_dns_infrastructure::dns::MessageCache;
use std::net::Ipv4Addr;

fn cache(ttl_secs: u64) -> MessageCache {
    MessageCache::new(&CacheConfig {
        ttl_secs,
        shards: 4,
        max_entries: 64,
    })
}

fn key(name: &str) -> QueryKey {
    QueryKey::new(name, 1, 1)
}

#[test]
fn set_then_get_is_a_fresh_hit_with_the_same_message() {
    let cache = cache(30);
    let key = key("example.com.");
    let message = a_response_bytes("example.com.", Ipv4Addr::new(10, 0, 0, 1));

    cache.set(&key, &message).unwrap();
    let lookup = cache.get(&key);

    assert_eq!(lookup.status, CacheStatus::Fresh);
    assert_eq!(lookup.message.unwrap(), message);
}

#[test]
fn expired_entry_is_a_stale_hit_with_the_message_intact() {
    // TTL of zero expires immediately; the message must still come back.
    let cache = cache(0);
    let key = key("example.com.");
    let message = a_response_bytes("example.com.", Ipv4Addr::new(10, 0, 0, 1));

    cache.set(&key, &message).unwrap();
    let lookup = cache.get(&key);

    assert_eq!(lookup.status, CacheStatus::Stale);
    assert_eq!(lookup.message.unwrap(), message);
}

#[test]
fn unknown_key_is_a_miss() {
    let cache = cache(30);
    let lookup = cache.get(&key("never-stored.example.com."));
    assert_eq!(lookup.status, CacheStatus::Miss);
    assert!(lookup.message.is_none());
}

#[test]
fn undecodable_stored_message_reads_as_miss() {
    // Twelve bytes pass the length check but are not a decodable message.
    let cache = cache(30);
    let key = key("garbage.example.com.");
    cache.set(&key, &[0xFF; 12]).unwrap();

    let lookup = cache.get(&key);
    assert_eq!(lookup.status, CacheStatus::Miss);
}

#[test]
fn messages_shorter_than_a_header_are_refused() {
    let cache = cache(30);
    assert!(cache.set(&key("example.com."), &[0u8; 5]).is_err());
}

#[test]
fn overwrite_refreshes_the_entry() {
    let cache = cache(30);
    let key = key("example.com.");
    let first = a_response_bytes("example.com.", Ipv4Addr::new(10, 0, 0, 1));
    let second = a_response_bytes("example.com.", Ipv4Addr::new(10, 0, 0, 2));

    cache.set(&key, &first).unwrap();
    cache.set(&key, &second).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key).message.unwrap(), second);
}

#[test]
fn distinct_types_are_distinct_entries() {
    let cache = cache(30);
    let message = a_response_bytes("example.com.", Ipv4Addr::new(10, 0, 0, 1));

    cache.set(&QueryKey::new("example.com.", 1, 1), &message).unwrap();
    cache.set(&QueryKey::new("example.com.", 1, 28), &message).unwrap();

    assert_eq!(cache.len(), 2);
}
