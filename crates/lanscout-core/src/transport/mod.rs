//! Non-blocking UDP transports for discovery queries.
//!
//! Two variants share the same send/drain surface: [`BroadcastTransport`]
//! fans a query out to unicast-broadcast addresses, [`MulticastTransport`]
//! joins a discovery group. Raw socket errors are classified per platform
//! so the drain loop can tell transient and refusal conditions apart from
//! real failures.

pub mod broadcast;
pub mod multicast;

pub use broadcast::BroadcastTransport;
pub use multicast::MulticastTransport;

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::TransportError;

/// Largest datagram a single receive call will accept.
pub const MAX_DATAGRAM_SIZE: usize = 8192;

/// Common surface of the broadcast and multicast transports.
pub trait Transport {
    /// Send one datagram without blocking.
    fn send_to(&self, payload: &[u8], dest: SocketAddr) -> Result<(), TransportError>;

    /// Pull pending datagrams until the socket has nothing more to give.
    fn incoming(&self) -> Incoming<'_>;

    /// Switch to blocking reads bounded by `timeout` for the drain step.
    fn set_read_timeout(&self, timeout: Duration) -> Result<(), TransportError>;

    /// Release the socket. Idempotent.
    fn close(&mut self);
}

/// How a raw socket error affects the current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    /// Nothing to do right now; the current pull ends, not an error.
    Transient,
    /// Refusal signal on an unconnected UDP socket; unreliable, suppressed.
    Refusal,
    /// A real socket failure; surfaces to the caller.
    Fatal,
}

pub(crate) fn classify_recv(err: &io::Error) -> ErrorClass {
    match err.kind() {
        // Read-timeout expiry surfaces as WouldBlock on unix and as
        // TimedOut on Windows; both end the drain cleanly.
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => ErrorClass::Transient,
        io::ErrorKind::ConnectionRefused => ErrorClass::Refusal,
        _ => classify_raw(err.raw_os_error()),
    }
}

/// Platform error-code table for conditions `io::ErrorKind` has no stable
/// mapping for.
#[cfg(unix)]
fn classify_raw(code: Option<i32>) -> ErrorClass {
    match code {
        Some(libc::EMSGSIZE) | Some(libc::EINPROGRESS) => ErrorClass::Transient,
        _ => ErrorClass::Fatal,
    }
}

#[cfg(windows)]
fn classify_raw(code: Option<i32>) -> ErrorClass {
    const WSAEMSGSIZE: i32 = 10040;
    const WSAEINPROGRESS: i32 = 10036;
    const WSAENETRESET: i32 = 10052;
    const WSAECONNRESET: i32 = 10054;
    const WSAETIMEDOUT: i32 = 10060;

    match code {
        Some(WSAEMSGSIZE) | Some(WSAEINPROGRESS) => ErrorClass::Transient,
        Some(WSAENETRESET) | Some(WSAECONNRESET) | Some(WSAETIMEDOUT) => ErrorClass::Refusal,
        _ => ErrorClass::Fatal,
    }
}

/// Shared send path with transient-error handling.
///
/// An interrupted call retries the identical send; a connection-refused
/// signal on an unconnected UDP socket carries no useful information and
/// is swallowed.
pub(crate) fn send_datagram(
    socket: &UdpSocket,
    payload: &[u8],
    dest: SocketAddr,
) -> Result<(), TransportError> {
    loop {
        match socket.send_to(payload, dest) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => return Ok(()),
            Err(e) => return Err(TransportError::Send(e)),
        }
    }
}

/// Leave pure non-blocking mode and bound each receive by `timeout`
/// instead, so a drain pass gives up on its own deadline.
pub(crate) fn enter_timeout_mode(
    socket: &UdpSocket,
    timeout: Duration,
) -> Result<(), TransportError> {
    socket.set_nonblocking(false).map_err(TransportError::Setup)?;
    socket
        .set_read_timeout(Some(timeout))
        .map_err(TransportError::Setup)?;
    Ok(())
}

/// Lazy pull of pending datagrams from one transport.
///
/// Finite and not restartable: once a pull ends the sequence, further
/// calls keep returning `None`. A fatal socket error is yielded exactly
/// once and also ends the sequence.
pub struct Incoming<'a> {
    socket: Option<&'a UdpSocket>,
    /// Remaining read budget in bytes; `None` means uncapped.
    budget: Option<usize>,
    done: bool,
}

impl<'a> Incoming<'a> {
    pub(crate) fn new(socket: Option<&'a UdpSocket>, budget: Option<usize>) -> Self {
        Self {
            socket,
            budget,
            done: false,
        }
    }
}

impl Iterator for Incoming<'_> {
    type Item = Result<(Vec<u8>, SocketAddr), TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(socket) = self.socket else {
            self.done = true;
            return Some(Err(TransportError::Closed));
        };
        if matches!(self.budget, Some(0)) {
            self.done = true;
            return None;
        }

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => {
                if let Some(budget) = &mut self.budget {
                    *budget = budget.saturating_sub(len);
                }
                Some(Ok((buf[..len].to_vec(), from)))
            }
            Err(e) => {
                self.done = true;
                match classify_recv(&e) {
                    ErrorClass::Transient | ErrorClass::Refusal => None,
                    ErrorClass::Fatal => Some(Err(TransportError::Recv(e))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::thread;

    #[test]
    fn test_would_block_is_transient() {
        let err = io::Error::from(io::ErrorKind::WouldBlock);
        assert_eq!(classify_recv(&err), ErrorClass::Transient);
    }

    #[test]
    fn test_interrupted_is_transient() {
        let err = io::Error::from(io::ErrorKind::Interrupted);
        assert_eq!(classify_recv(&err), ErrorClass::Transient);
    }

    #[test]
    fn test_connection_refused_is_refusal() {
        let err = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(classify_recv(&err), ErrorClass::Refusal);
    }

    #[cfg(unix)]
    #[test]
    fn test_oversized_datagram_is_transient() {
        let err = io::Error::from_raw_os_error(libc::EMSGSIZE);
        assert_eq!(classify_recv(&err), ErrorClass::Transient);
    }

    #[cfg(unix)]
    #[test]
    fn test_connection_reset_is_fatal_on_unix() {
        let err = io::Error::from_raw_os_error(libc::ECONNRESET);
        assert_eq!(classify_recv(&err), ErrorClass::Fatal);
    }

    #[test]
    fn test_permission_denied_is_fatal() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(classify_recv(&err), ErrorClass::Fatal);
    }

    fn socket_pair() -> (UdpSocket, UdpSocket, SocketAddr) {
        let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let addr = receiver.local_addr().unwrap();
        (receiver, sender, addr)
    }

    #[test]
    fn test_incoming_stops_at_budget() {
        let (receiver, sender, addr) = socket_pair();
        for _ in 0..4 {
            sender.send_to(&[0u8; 100], addr).unwrap();
        }
        // Give loopback delivery a moment before draining.
        thread::sleep(Duration::from_millis(50));
        receiver
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();

        let first: Vec<_> = Incoming::new(Some(&receiver), Some(250)).collect();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|item| item.is_ok()));

        // The fourth datagram is still queued for the next pull.
        let second: Vec<_> = Incoming::new(Some(&receiver), None).collect();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_incoming_is_not_restartable() {
        let (receiver, _sender, _addr) = socket_pair();
        receiver
            .set_read_timeout(Some(Duration::from_millis(50)))
            .unwrap();

        let mut incoming = Incoming::new(Some(&receiver), None);
        assert!(incoming.next().is_none());
        assert!(incoming.next().is_none());
    }

    #[test]
    fn test_incoming_on_closed_socket_errors_once() {
        let mut incoming = Incoming::new(None, None);
        assert!(matches!(
            incoming.next(),
            Some(Err(TransportError::Closed))
        ));
        assert!(incoming.next().is_none());
    }
}
