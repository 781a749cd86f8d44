//! Multicast group member transport.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, SockRef, Socket, Type};

use super::{enter_timeout_mode, send_datagram, Incoming, Transport};
use crate::error::TransportError;

/// Upper bound on bytes drained from the group socket in one
/// `incoming()` call. A busy segment could otherwise hold a single drain
/// pass indefinitely.
const MAX_THROUGHPUT: usize = 256 * 1024;

/// UDP transport joined to a multicast discovery group.
pub struct MulticastTransport {
    socket: Option<UdpSocket>,
    interface: Ipv4Addr,
    joined: Option<Ipv4Addr>,
}

impl MulticastTransport {
    /// Create a non-blocking socket bound to `(interface, port)`.
    ///
    /// `listen_multiple` enables address reuse (and port reuse on unix) so
    /// co-resident listeners can share the discovery port.
    pub fn open(
        interface: Ipv4Addr,
        port: u16,
        listen_multiple: bool,
    ) -> Result<Self, TransportError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(TransportError::Setup)?;
        socket.set_nonblocking(true).map_err(TransportError::Setup)?;

        if listen_multiple {
            socket.set_reuse_address(true).map_err(TransportError::Setup)?;
            #[cfg(unix)]
            socket.set_reuse_port(true).map_err(TransportError::Setup)?;
        }

        let addr = SocketAddr::from(SocketAddrV4::new(interface, port));
        socket.bind(&addr.into()).map_err(TransportError::Setup)?;

        Ok(Self {
            socket: Some(socket.into()),
            interface,
            joined: None,
        })
    }

    /// Route outgoing multicast through this transport's interface.
    pub fn set_outgoing_interface(&self) -> Result<(), TransportError> {
        let socket = self.socket()?;
        SockRef::from(socket)
            .set_multicast_if_v4(&self.interface)
            .map_err(TransportError::Setup)
    }

    /// Set the multicast TTL. A TTL of 1 keeps queries on the local
    /// segment; multicast crosses router hops at higher values.
    pub fn set_ttl(&self, ttl: u32) -> Result<(), TransportError> {
        self.socket()?
            .set_multicast_ttl_v4(ttl)
            .map_err(TransportError::Setup)
    }

    /// Join `group` on this transport's interface.
    pub fn join_group(&mut self, group: Ipv4Addr) -> Result<(), TransportError> {
        let socket = self.socket.as_ref().ok_or(TransportError::Closed)?;
        socket
            .join_multicast_v4(&group, &self.interface)
            .map_err(TransportError::Setup)?;
        self.joined = Some(group);
        Ok(())
    }

    /// Leave the joined group, if any.
    pub fn leave_group(&mut self) -> Result<(), TransportError> {
        let Some(group) = self.joined.take() else {
            return Ok(());
        };
        let socket = self.socket.as_ref().ok_or(TransportError::Closed)?;
        socket
            .leave_multicast_v4(&group, &self.interface)
            .map_err(TransportError::Setup)
    }

    /// Bound local address.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket()?.local_addr().map_err(TransportError::Setup)
    }

    fn socket(&self) -> Result<&UdpSocket, TransportError> {
        self.socket.as_ref().ok_or(TransportError::Closed)
    }
}

impl Transport for MulticastTransport {
    fn send_to(&self, payload: &[u8], dest: SocketAddr) -> Result<(), TransportError> {
        send_datagram(self.socket()?, payload, dest)
    }

    fn incoming(&self) -> Incoming<'_> {
        Incoming::new(self.socket.as_ref(), Some(MAX_THROUGHPUT))
    }

    fn set_read_timeout(&self, timeout: Duration) -> Result<(), TransportError> {
        enter_timeout_mode(self.socket()?, timeout)
    }

    fn close(&mut self) {
        let _ = self.leave_group();
        self.socket.take();
    }
}

impl Drop for MulticastTransport {
    fn drop(&mut self) {
        // Group membership must not outlive the round, even when setup or
        // send failed midway.
        let _ = self.leave_group();
    }
}
