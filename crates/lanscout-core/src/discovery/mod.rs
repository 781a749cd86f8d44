//! One-shot discovery rounds.
//!
//! A round opens one multicast transport plus one broadcast transport per
//! candidate address, fires the family's query on each path, then drains
//! every surviving transport in open order and merges replies into a
//! result set keyed by the family's identity header.

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use crate::error::{DiscoveryError, TransportError};
use crate::protocol::headers::parse_header_block;
use crate::protocol::{ProtocolFamily, Query};
use crate::transport::{BroadcastTransport, MulticastTransport, Transport};

/// Response headers for one discovered service.
pub type ServiceInfo = HashMap<String, String>;

/// Result of a discovery round, keyed by identity-header value.
pub type ServiceMap = HashMap<String, ServiceInfo>;

/// Options for one discovery round.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Source interface address; resolved from the default route when unset.
    pub interface: Option<Ipv4Addr>,
    /// Receive window per transport.
    pub timeout: Duration,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            interface: None,
            timeout: Duration::from_secs(1),
        }
    }
}

/// Run one discovery round and return the deduplicated responder set.
///
/// Per-transport failures degrade the round instead of aborting it: the
/// result is whatever subset of responders answered in time, possibly
/// empty. Only interface resolution can fail the call itself.
pub fn discover(
    family: ProtocolFamily,
    options: &DiscoverOptions,
) -> Result<ServiceMap, DiscoveryError> {
    let interface = match options.interface {
        Some(addr) => addr,
        None => default_interface()?,
    };

    let query = family.query();
    let group_port = query.group.port();
    let destinations: Vec<SocketAddr> = broadcast_candidates(interface)
        .into_iter()
        .map(|addr| SocketAddr::from(SocketAddrV4::new(addr, group_port)))
        .collect();

    Ok(run_round(&query, Some(interface), &destinations, options.timeout))
}

/// Resolve the interface address the default route would use.
///
/// Connecting a UDP socket selects a source address without putting
/// anything on the wire.
fn default_interface() -> Result<Ipv4Addr, DiscoveryError> {
    let local_addr = (|| -> io::Result<SocketAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect("8.8.8.8:80")?;
        socket.local_addr()
    })()
    .map_err(DiscoveryError::InterfaceResolution)?;

    match local_addr {
        SocketAddr::V4(addr) => Ok(*addr.ip()),
        SocketAddr::V6(_) => Err(DiscoveryError::InterfaceResolution(io::Error::new(
            io::ErrorKind::Unsupported,
            "default route is not IPv4",
        ))),
    }
}

/// Broadcast destinations tried alongside the multicast group.
///
/// Interfaces inside the common private ranges get their subnet broadcast
/// address tried first; the limited broadcast and loopback addresses are
/// always included.
fn broadcast_candidates(interface: Ipv4Addr) -> Vec<Ipv4Addr> {
    let mut candidates = vec![Ipv4Addr::BROADCAST, Ipv4Addr::LOCALHOST];
    let octets = interface.octets();
    if octets[0] == 192 && octets[1] == 168 {
        candidates.insert(0, Ipv4Addr::new(192, 168, octets[2], 255));
    } else if octets[0] == 10 {
        candidates.insert(0, Ipv4Addr::new(10, 255, 255, 255));
    }
    candidates
}

/// Open, send, and drain every transmission path for one query.
///
/// `multicast_interface` of `None` skips the multicast path entirely
/// (tests exercise pure unicast rounds this way). Transports are drained
/// strictly in open order; dropping them at the end leaves the group and
/// closes every socket regardless of how the round went.
fn run_round(
    query: &Query,
    multicast_interface: Option<Ipv4Addr>,
    destinations: &[SocketAddr],
    timeout: Duration,
) -> ServiceMap {
    let mut transports: Vec<Box<dyn Transport>> = Vec::new();

    if let Some(interface) = multicast_interface {
        match open_multicast(query, interface, timeout) {
            Ok(transport) => transports.push(Box::new(transport)),
            Err(e) => eprintln!("multicast path unavailable: {}", e),
        }
    }

    for dest in destinations {
        match open_broadcast(query, *dest, timeout) {
            Ok(transport) => transports.push(Box::new(transport)),
            Err(e) => eprintln!("broadcast path {} unavailable: {}", dest, e),
        }
    }

    let mut services = ServiceMap::new();
    for transport in &transports {
        for received in transport.incoming() {
            match received {
                Ok((payload, from)) => merge_response(&mut services, query, &payload, from),
                Err(e) => {
                    // A fatal receive error abandons this transport only.
                    eprintln!("receive error: {}", e);
                    break;
                }
            }
        }
    }

    services
}

fn open_multicast(
    query: &Query,
    interface: Ipv4Addr,
    timeout: Duration,
) -> Result<MulticastTransport, TransportError> {
    let mut transport = MulticastTransport::open(interface, 0, false)?;
    transport.set_outgoing_interface()?;
    transport.set_ttl(1)?;
    transport.set_read_timeout(timeout)?;
    transport.join_group(*query.group.ip())?;
    transport.send_to(query.payload, SocketAddr::from(query.group))?;
    Ok(transport)
}

fn open_broadcast(
    query: &Query,
    dest: SocketAddr,
    timeout: Duration,
) -> Result<BroadcastTransport, TransportError> {
    let transport = BroadcastTransport::open()?;
    transport.set_read_timeout(timeout)?;
    transport.send_to(query.payload, dest)?;
    Ok(transport)
}

/// Fold one reply into the result set.
///
/// Malformed datagrams (no line ending after the status line) and replies
/// without the identity header are skipped. The first reply for an
/// identity wins; the same responder heard over another path changes
/// nothing.
fn merge_response(services: &mut ServiceMap, query: &Query, payload: &[u8], from: SocketAddr) {
    let text = String::from_utf8_lossy(payload);
    let Some((_status, header_block)) = text.split_once("\r\n") else {
        return;
    };

    let headers = parse_header_block(header_block);
    let Some(identity) = headers.get(query.identity_header) else {
        return;
    };
    if services.contains_key(identity) {
        return;
    }

    let identity = identity.clone();
    let mut info: ServiceInfo = headers;
    if query.record_sender {
        info.insert("Address".to_string(), from.ip().to_string());
    }
    services.insert(identity, info);
}
