//! Core library for lanscout LAN service discovery.
//!
//! One-shot UDP discovery of GDM media servers and SSDP/UPnP root devices:
//! a query fans out over the family's multicast group plus a set of
//! unicast-broadcast addresses, replies are drained within a bounded window,
//! and responders are merged into a result set keyed by the family's
//! identity header.

pub mod discovery;
pub mod error;
pub mod protocol;
pub mod transport;

pub use discovery::{discover, DiscoverOptions, ServiceInfo, ServiceMap};
pub use error::{DiscoveryError, TransportError};
pub use protocol::ProtocolFamily;
