//! Discovery query composition.
//!
//! Two wire families are supported: the single-line GDM media-server probe
//! and the SSDP root-device search. Composition is pure data; all I/O
//! lives in the transports.

pub mod headers;

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

/// GDM discovery group.
pub const GDM_GROUP: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 0, 0, 250), 32414);

/// SSDP discovery group.
pub const SSDP_GROUP: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

const GDM_QUERY: &[u8] = b"M-SEARCH * HTTP/1.0";

const SSDP_QUERY: &[u8] = b"M-SEARCH * HTTP/1.1\r\n\
    MX: 3\r\n\
    ST: upnp:rootdevice\r\n\
    HOST: 239.255.255.250:1900\r\n\
    MAN: \"ssdp:discover\"\r\n\
    \r\n";

/// Which discovery wire format a round speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    /// Media-server discovery; a single request line, no headers.
    Gdm,
    /// UPnP root-device discovery.
    Ssdp,
}

impl ProtocolFamily {
    /// Build the query this family sends on every transmission path.
    pub fn query(self) -> Query {
        match self {
            ProtocolFamily::Gdm => Query {
                payload: GDM_QUERY,
                group: GDM_GROUP,
                identity_header: "Resource-Identifier",
                record_sender: true,
            },
            ProtocolFamily::Ssdp => Query {
                payload: SSDP_QUERY,
                group: SSDP_GROUP,
                identity_header: "USN",
                record_sender: false,
            },
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFamily::Gdm => write!(f, "GDM"),
            ProtocolFamily::Ssdp => write!(f, "SSDP"),
        }
    }
}

/// One composed discovery query.
#[derive(Debug, Clone)]
pub struct Query {
    /// Request bytes, sent verbatim on every path.
    pub payload: &'static [u8],
    /// Multicast group and port for this family.
    pub group: SocketAddrV4,
    /// Response header whose value keys the result set.
    pub identity_header: &'static str,
    /// Record the responder's address under an `Address` key.
    pub record_sender: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::headers::parse_header_block;

    #[test]
    fn test_gdm_query_is_bare_search_line() {
        let query = ProtocolFamily::Gdm.query();
        assert_eq!(query.payload, b"M-SEARCH * HTTP/1.0");
        assert_eq!(query.group.port(), 32414);
        assert_eq!(query.identity_header, "Resource-Identifier");
        assert!(query.record_sender);
    }

    #[test]
    fn test_ssdp_query_round_trips_through_header_parser() {
        let query = ProtocolFamily::Ssdp.query();
        let text = std::str::from_utf8(query.payload).unwrap();

        let (status, block) = text.split_once("\r\n").unwrap();
        assert_eq!(status, "M-SEARCH * HTTP/1.1");

        let headers = parse_header_block(block);
        assert_eq!(headers["MX"], "3");
        assert_eq!(headers["ST"], "upnp:rootdevice");
        assert_eq!(headers["HOST"], "239.255.255.250:1900");
        assert_eq!(headers["MAN"], "\"ssdp:discover\"");
    }

    #[test]
    fn test_ssdp_query_ends_with_blank_line() {
        let query = ProtocolFamily::Ssdp.query();
        assert!(query.payload.ends_with(b"\r\n\r\n"));
        assert_eq!(query.group.port(), 1900);
        assert_eq!(query.identity_header, "USN");
        assert!(!query.record_sender);
    }
}
