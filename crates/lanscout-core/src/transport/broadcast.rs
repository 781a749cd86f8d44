//! Broadcast-capable UDP transport.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use super::{enter_timeout_mode, send_datagram, Incoming, Transport};
use crate::error::TransportError;

/// UDP transport that may send to broadcast addresses.
///
/// Never binds: replies come back to the ephemeral source port chosen on
/// the first send. Expected reply volume per socket is low, so the drain
/// pull is uncapped.
pub struct BroadcastTransport {
    socket: Option<UdpSocket>,
}

impl BroadcastTransport {
    /// Create a non-blocking socket with `SO_BROADCAST` enabled.
    pub fn open() -> Result<Self, TransportError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(TransportError::Setup)?;
        socket.set_broadcast(true).map_err(TransportError::Setup)?;
        socket.set_nonblocking(true).map_err(TransportError::Setup)?;

        Ok(Self {
            socket: Some(socket.into()),
        })
    }

    fn socket(&self) -> Result<&UdpSocket, TransportError> {
        self.socket.as_ref().ok_or(TransportError::Closed)
    }
}

impl Transport for BroadcastTransport {
    fn send_to(&self, payload: &[u8], dest: SocketAddr) -> Result<(), TransportError> {
        send_datagram(self.socket()?, payload, dest)
    }

    fn incoming(&self) -> Incoming<'_> {
        Incoming::new(self.socket.as_ref(), None)
    }

    fn set_read_timeout(&self, timeout: Duration) -> Result<(), TransportError> {
        enter_timeout_mode(self.socket()?, timeout)
    }

    fn close(&mut self) {
        self.socket.take();
    }
}
