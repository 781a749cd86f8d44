//! Error types for lanscout core.

use std::io;

use thiserror::Error;

/// Errors raised by a single UDP transport.
///
/// The orchestrator contains these at per-transport granularity; one bad
/// transport never aborts a whole discovery round.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket setup failed: {0}")]
    Setup(#[source] io::Error),

    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    #[error("receive failed: {0}")]
    Recv(#[source] io::Error),

    #[error("transport is closed")]
    Closed,
}

/// Errors that escape a whole discovery round.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to resolve local interface address: {0}")]
    InterfaceResolution(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Closed;
        assert_eq!(format!("{}", err), "transport is closed");
    }

    #[test]
    fn test_setup_error_carries_cause() {
        let cause = io::Error::new(io::ErrorKind::AddrInUse, "address in use");
        let err = TransportError::Setup(cause);
        assert!(format!("{}", err).contains("address in use"));
    }
}
