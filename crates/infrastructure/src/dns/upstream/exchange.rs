//! One query/response exchange with a single nameserver. The shared timeout
//! is applied separately to the write and read phases.

use bytes::Bytes;
use relay_dns_domain::{DnsProtocol, DomainError};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub async fn exchange(
    protocol: DnsProtocol,
    server: SocketAddr,
    query: &[u8],
    timeout: Duration,
) -> Result<Bytes, DomainError> {
    match protocol {
        DnsProtocol::Udp => exchange_udp(server, query, timeout).await,
        DnsProtocol::Tcp => exchange_tcp(server, query, timeout).await,
    }
}

async fn exchange_udp(
    server: SocketAddr,
    query: &[u8],
    timeout: Duration,
) -> Result<Bytes, DomainError> {
    // Ephemeral port, matching the server's address family.
    let bind_addr: SocketAddr = if server.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| DomainError::Io(format!("failed to bind UDP socket: {e}")))?;

    tokio::time::timeout(timeout, socket.send_to(query, server))
        .await
        .map_err(|_| DomainError::Timeout)?
        .map_err(|e| DomainError::Io(format!("failed to send UDP query to {server}: {e}")))?;

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    let (bytes_received, from_addr) =
        tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
            .await
            .map_err(|_| DomainError::Timeout)?
            .map_err(|e| {
                DomainError::Io(format!("failed to receive UDP response from {server}: {e}"))
            })?;

    if from_addr.ip() != server.ip() {
        warn!(expected = %server, received_from = %from_addr, "UDP response from unexpected source");
    }

    recv_buf.truncate(bytes_received);
    debug!(server = %server, bytes = bytes_received, "UDP response received");
    Ok(Bytes::from(recv_buf))
}

async fn exchange_tcp(
    server: SocketAddr,
    query: &[u8],
    timeout: Duration,
) -> Result<Bytes, DomainError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(server))
        .await
        .map_err(|_| DomainError::Timeout)?
        .map_err(|e| DomainError::Io(format!("connection refused by {server}: {e}")))?;

    stream
        .set_nodelay(true)
        .map_err(|e| DomainError::Io(format!("failed to set TCP_NODELAY on {server}: {e}")))?;

    tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, query))
        .await
        .map_err(|_| DomainError::Timeout)?
        .map_err(|e| DomainError::Io(format!("failed to send TCP query to {server}: {e}")))?;

    let response = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
        .await
        .map_err(|_| DomainError::Timeout)?
        .map_err(|e| DomainError::Io(format!("failed to read TCP response from {server}: {e}")))?;

    debug!(server = %server, bytes = response.len(), "TCP response received");
    Ok(response)
}

async fn send_with_length_prefix(stream: &mut TcpStream, message: &[u8]) -> std::io::Result<()> {
    let len = u16::try_from(message.len())
        .map_err(|_| std::io::Error::other("DNS message exceeds TCP length prefix"))?;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(message).await?;
    stream.flush().await
}

async fn read_with_length_prefix(stream: &mut TcpStream) -> std::io::Result<Bytes> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let len = u16::from_be_bytes(len_buf) as usize;
    if len == 0 {
        return Err(std::io::Error::other("zero-length TCP message"));
    }
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    Ok(Bytes::from(body))
}
