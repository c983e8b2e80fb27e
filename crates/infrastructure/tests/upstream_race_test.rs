//! Staggered-race behavior against scripted upstream nameservers.

mod helpers;

use helpers::{a_query_bytes, answer_ips, MockBehavior, MockDnsServer, MockTcpDnsServer};
use hickory_proto::op::{Message, ResponseCode};
use relay_dns_application::ports::UpstreamResolver;
use relay_dns_domain::{DnsProtocol, DomainError};
use relay_dns_infrastructure::dns::upstream::resolv_conf::ResolverConfig;
use relay_dns_infrastructure::dns::RacingResolver;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

fn resolver(nameservers: Vec<SocketAddr>, timeout: Duration) -> RacingResolver {
    RacingResolver::new(ResolverConfig {
        nameservers,
        timeout,
    })
}

#[tokio::test]
async fn first_server_answer_wins_immediately() {
    let ip = Ipv4Addr::new(10, 0, 0, 1);
    let (_server, addr) = MockDnsServer::start(MockBehavior::Answer(ip)).await.unwrap();
    let resolver = resolver(vec![addr], Duration::from_secs(2));

    let started = Instant::now();
    let response = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    let message = Message::from_vec(&response).unwrap();
    assert_eq!(answer_ips(&message), vec![ip]);
}

#[tokio::test]
async fn third_server_wins_when_first_two_are_silent() {
    let timeout = Duration::from_millis(200);
    let ip = Ipv4Addr::new(10, 0, 0, 3);
    let (_s1, a1) = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let (_s2, a2) = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let (_s3, a3) = MockDnsServer::start(MockBehavior::Answer(ip)).await.unwrap();
    let resolver = resolver(vec![a1, a2, a3], timeout);

    let started = Instant::now();
    let response = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    // Two full stagger intervals pass before the third attempt even starts;
    // the total stays within roughly 3x the shared timeout.
    assert!(elapsed >= Duration::from_millis(380), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(900), "elapsed {elapsed:?}");
    let message = Message::from_vec(&response).unwrap();
    assert_eq!(answer_ips(&message), vec![ip]);
}

#[tokio::test]
async fn servfail_leaves_the_race_to_later_servers() {
    let ip = Ipv4Addr::new(10, 0, 0, 2);
    let (_s1, a1) = MockDnsServer::start(MockBehavior::ServFail).await.unwrap();
    let (_s2, a2) = MockDnsServer::start(MockBehavior::Answer(ip)).await.unwrap();
    let resolver = resolver(vec![a1, a2], Duration::from_millis(200));

    let response = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap();

    let message = Message::from_vec(&response).unwrap();
    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert_eq!(answer_ips(&message), vec![ip]);
}

#[tokio::test]
async fn nxdomain_terminates_the_race() {
    let timeout = Duration::from_millis(500);
    let (_s1, a1) = MockDnsServer::start(MockBehavior::NxDomain).await.unwrap();
    let (_s2, a2) = MockDnsServer::start(MockBehavior::Answer(Ipv4Addr::new(10, 0, 0, 9)))
        .await
        .unwrap();
    let resolver = resolver(vec![a1, a2], timeout);

    let started = Instant::now();
    let response = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("no-such-name.example.com."))
        .await
        .unwrap();

    // The negative answer is definitive: no second attempt is started.
    assert!(started.elapsed() < timeout);
    let message = Message::from_vec(&response).unwrap();
    assert_eq!(message.response_code(), ResponseCode::NXDomain);
}

#[tokio::test]
async fn all_failures_name_every_server_attempted() {
    let (_s1, a1) = MockDnsServer::start(MockBehavior::ServFail).await.unwrap();
    let (_s2, a2) = MockDnsServer::start(MockBehavior::ServFail).await.unwrap();
    let resolver = resolver(vec![a1, a2], Duration::from_millis(200));

    let err = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap_err();

    match err {
        DomainError::ResolutionFailed {
            qname,
            protocol,
            nameservers,
        } => {
            assert_eq!(qname, "example.com.");
            assert_eq!(protocol, DnsProtocol::Udp);
            assert_eq!(nameservers, vec![a1.to_string(), a2.to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_nameserver_list_fails_without_io() {
    let resolver = resolver(vec![], Duration::from_millis(200));
    let err = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ResolutionFailed { .. }));
}

#[tokio::test]
async fn tcp_lookup_round_trips_the_length_prefixed_framing() {
    let ip = Ipv4Addr::new(10, 0, 0, 5);
    let (_server, addr) = MockTcpDnsServer::start(MockBehavior::Answer(ip))
        .await
        .unwrap();
    let resolver = resolver(vec![addr], Duration::from_secs(2));

    let response = resolver
        .lookup(DnsProtocol::Tcp, a_query_bytes("example.com."))
        .await
        .unwrap();

    let message = Message::from_vec(&response).unwrap();
    assert_eq!(message.response_code(), ResponseCode::NoError);
    assert_eq!(answer_ips(&message), vec![ip]);
}

#[tokio::test]
async fn tcp_race_falls_past_a_servfail_server() {
    let ip = Ipv4Addr::new(10, 0, 0, 6);
    let (_s1, a1) = MockTcpDnsServer::start(MockBehavior::ServFail).await.unwrap();
    let (_s2, a2) = MockTcpDnsServer::start(MockBehavior::Answer(ip)).await.unwrap();
    let resolver = resolver(vec![a1, a2], Duration::from_millis(200));

    let response = resolver
        .lookup(DnsProtocol::Tcp, a_query_bytes("example.com."))
        .await
        .unwrap();

    let message = Message::from_vec(&response).unwrap();
    assert_eq!(answer_ips(&message), vec![ip]);
}

#[tokio::test]
async fn delayed_answer_is_accepted_mid_interval() {
    // An answer arriving partway through the stagger interval wins without
    // waiting out the full timeout.
    let ip = Ipv4Addr::new(10, 0, 0, 7);
    let (_server, addr) =
        MockDnsServer::start_with_delay(MockBehavior::Answer(ip), Duration::from_millis(300))
            .await
            .unwrap();
    let resolver = resolver(vec![addr], Duration::from_millis(450));

    let response = resolver
        .lookup(DnsProtocol::Udp, a_query_bytes("example.com."))
        .await
        .unwrap();

    let message = Message::from_vec(&response).unwrap();
    assert_eq!(answer_ips(&message), vec![ip]);
}
