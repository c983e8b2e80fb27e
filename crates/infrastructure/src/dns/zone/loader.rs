//! Zone file loading. Each `*.dns-conf` file holds one record per line:
//!
//! ```text
//! # name [ttl] [class] type rdata
//! nas.home.lan        300 IN A     192.168.1.10
//! www.home.lan            IN CNAME nas.home.lan
//! 192.168.1.10            IN PTR   nas.home.lan
//! promo.example.com       IN CNAME direct
//! *.lab.home.lan          IN A     10.0.0.7
//! ```
//!
//! Parse failures are logged per line/file and contribute no records; they
//! never abort the load.

use super::ZoneTable;
use hickory_proto::rr::rdata::{self, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use relay_dns_domain::DomainError;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, warn};

const DEFAULT_TTL: u32 = 3600;

/// Walk `dir` for zone files, building a fresh table. A `resolv.conf` found
/// along the way is reported for the upstream resolver.
pub fn load_dir(dir: &Path) -> (ZoneTable, Option<PathBuf>) {
    let mut table = ZoneTable::new();
    let mut resolv_conf = None;
    walk(dir, &mut table, &mut resolv_conf);
    (table, resolv_conf)
}

fn walk(dir: &Path, table: &mut ZoneTable, resolv_conf: &mut Option<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Failed to read zone conf directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, table, resolv_conf);
        } else if path.extension().is_some_and(|ext| ext == "dns-conf") {
            load_file(&path, table);
        } else if path.file_name().is_some_and(|name| name == "resolv.conf") {
            *resolv_conf = Some(path);
        }
    }
}

fn load_file(path: &Path, table: &mut ZoneTable) {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to open zone conf file");
            return;
        }
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_record_line(line) {
            Ok(record) => {
                let name = record.name().to_utf8().to_ascii_lowercase();
                let class = u16::from(record.dns_class());
                let rtype = u16::from(record.record_type());
                table.insert(name, class, rtype, record);
            }
            Err(e) => {
                warn!(file = %path.display(), line = %line, error = %e, "Skipping zone record");
            }
        }
    }
}

/// Parse `name [ttl] [class] type rdata`. PTR owner names are written as IP
/// addresses and transformed to reverse-lookup form here, at load time.
pub fn parse_record_line(line: &str) -> Result<Record, DomainError> {
    let mut tokens = line.split_whitespace();
    let name_token = tokens
        .next()
        .ok_or_else(|| DomainError::InvalidRecord("empty record line".into()))?;

    let mut tokens = tokens.peekable();

    let mut ttl = DEFAULT_TTL;
    if let Some(token) = tokens.peek() {
        if let Ok(parsed) = token.parse::<u32>() {
            ttl = parsed;
            tokens.next();
        }
    }

    // DNSClass::from_str rejects lowercase input with an assert, not an Err.
    let mut class = DNSClass::IN;
    if let Some(token) = tokens.peek() {
        if let Ok(parsed) = DNSClass::from_str(&token.to_ascii_uppercase()) {
            class = parsed;
            tokens.next();
        }
    }

    let type_token = tokens
        .next()
        .ok_or_else(|| DomainError::InvalidRecord(format!("missing record type: {line}")))?;
    let rtype = RecordType::from_str(&type_token.to_ascii_uppercase())
        .map_err(|_| DomainError::InvalidRecord(format!("unknown record type: {type_token}")))?;

    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        return Err(DomainError::InvalidRecord(format!("missing rdata: {line}")));
    }

    let owner = if rtype == RecordType::PTR {
        reverse_owner(name_token)?
    } else {
        qualified_name(name_token)?
    };

    let rdata = parse_rdata(rtype, &rest)?;
    let mut record = Record::from_rdata(owner, ttl, rdata);
    record.set_dns_class(class);
    Ok(record)
}

fn parse_rdata(rtype: RecordType, rest: &[&str]) -> Result<RData, DomainError> {
    match rtype {
        RecordType::A => {
            let ip = rest[0]
                .parse()
                .map_err(|_| DomainError::InvalidRecord(format!("bad IPv4 address: {}", rest[0])))?;
            Ok(RData::A(rdata::A(ip)))
        }
        RecordType::AAAA => {
            let ip = rest[0]
                .parse()
                .map_err(|_| DomainError::InvalidRecord(format!("bad IPv6 address: {}", rest[0])))?;
            Ok(RData::AAAA(rdata::AAAA(ip)))
        }
        RecordType::CNAME => Ok(RData::CNAME(rdata::CNAME(qualified_name(rest[0])?))),
        RecordType::PTR => Ok(RData::PTR(rdata::PTR(qualified_name(rest[0])?))),
        RecordType::TXT => Ok(RData::TXT(TXT::new(vec![rest.join(" ")]))),
        other => Err(DomainError::InvalidRecord(format!(
            "unsupported record type: {other}"
        ))),
    }
}

/// Lowercase, fully qualified name.
fn qualified_name(token: &str) -> Result<Name, DomainError> {
    let mut text = token.to_ascii_lowercase();
    if !text.ends_with('.') {
        text.push('.');
    }
    Name::from_utf8(&text)
        .map_err(|e| DomainError::InvalidRecord(format!("bad domain name {token}: {e}")))
}

/// PTR owner names are declared as plain IP addresses; store them under
/// their `in-addr.arpa.` / `ip6.arpa.` form.
fn reverse_owner(token: &str) -> Result<Name, DomainError> {
    let ip: IpAddr = token
        .trim_matches('.')
        .parse()
        .map_err(|_| DomainError::InvalidRecord(format!("wrong PTR record, bad IP: {token}")))?;
    Name::from_utf8(&reverse_addr(&ip))
        .map_err(|e| DomainError::InvalidRecord(format!("bad reverse name for {token}: {e}")))
}

/// Reverse-lookup name for an address, e.g. `10.1.168.192.in-addr.arpa.`.
pub fn reverse_addr(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa.")
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                name.push(char::from_digit((byte & 0x0f) as u32, 16).unwrap_or('0'));
                name.push('.');
                name.push(char::from_digit((byte >> 4) as u32, 16).unwrap_or('0'));
                name.push('.');
            }
            name.push_str("ip6.arpa.");
            name
        }
    }
}
