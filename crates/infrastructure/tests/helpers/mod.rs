#![allow(dead_code)]

use bytes::Bytes;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{rdata, DNSClass, Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;

/// How a mock nameserver answers every query it receives.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Answer with a single A record pointing at the given address.
    Answer(Ipv4Addr),
    /// Answer with SERVFAIL.
    ServFail,
    /// Answer with NXDOMAIN.
    NxDomain,
    /// Never answer; clients hit their timeout.
    Silent,
}

/// Scripted UDP nameserver for exercising the racing resolver against
/// controlled upstream behavior. Listens on an ephemeral localhost port and
/// shuts down when dropped.
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<(Self, SocketAddr)> {
        Self::start_with_delay(behavior, Duration::ZERO).await
    }

    /// Like [`start`], but waits `delay` before sending each response.
    pub async fn start_with_delay(
        behavior: MockBehavior,
        delay: Duration,
    ) -> std::io::Result<(Self, SocketAddr)> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let local_addr = socket.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { break };
                        if let Some(response) = build_response(&buf[..len], behavior) {
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok((
            Self {
                addr: local_addr,
                shutdown_tx: Some(shutdown_tx),
            },
            local_addr,
        ))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Scripted TCP nameserver speaking the two-byte length-prefixed framing.
/// Same answering behaviors as [`MockDnsServer`].
pub struct MockTcpDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTcpDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<(Self, SocketAddr)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { break };
                        tokio::spawn(serve_tcp_connection(stream, behavior));
                    }
                }
            }
        });

        Ok((
            Self {
                addr: local_addr,
                shutdown_tx: Some(shutdown_tx),
            },
            local_addr,
        ))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockTcpDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve_tcp_connection(mut stream: TcpStream, behavior: MockBehavior) {
    let mut len_buf = [0u8; 2];
    if stream.read_exact(&mut len_buf).await.is_err() {
        return;
    }
    let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    if stream.read_exact(&mut query).await.is_err() {
        return;
    }
    if let Some(response) = build_response(&query, behavior) {
        let len = response.len() as u16;
        let _ = stream.write_all(&len.to_be_bytes()).await;
        let _ = stream.write_all(&response).await;
    }
}

fn build_response(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    let question = request.queries().first()?.clone();
    response.add_query(question.clone());

    match behavior {
        MockBehavior::Silent => return None,
        MockBehavior::ServFail => {
            response.set_response_code(ResponseCode::ServFail);
        }
        MockBehavior::NxDomain => {
            response.set_response_code(ResponseCode::NXDomain);
        }
        MockBehavior::Answer(ip) => {
            let record = Record::from_rdata(question.name().clone(), 60, RData::A(rdata::A(ip)));
            response.add_answers(vec![record]);
        }
    }

    response.to_vec().ok()
}

/// Wire-serialized IN/A query for `name` with a fixed transaction ID.
pub fn a_query_bytes(name: &str) -> Bytes {
    Bytes::from(a_query(name).to_vec().unwrap())
}

/// Decoded IN/A query message for `name`.
pub fn a_query(name: &str) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_utf8(name).unwrap());
    query.set_query_type(RecordType::A);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(0x4242, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

/// Wire-serialized NOERROR response carrying one A record for `name`.
pub fn a_response_bytes(name: &str, ip: Ipv4Addr) -> Bytes {
    let request = a_query(name);
    let bytes = build_response(&request.to_vec().unwrap(), MockBehavior::Answer(ip))
        .expect("answer behavior always builds a response");
    Bytes::from(bytes)
}

/// The A-record addresses carried in a response's answer section.
pub fn answer_ips(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}
