//! Move exchange with a remote peer. A move travels as one ASCII digit.

mod tcp;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::NetworkError;

pub use tcp::{connect, HostListener, TcpPeer};

/// The remote end of a networked game, as seen by the controller.
pub trait Peer {
    /// Send the column the local player just played.
    fn send_column(&mut self, column: usize) -> Result<(), NetworkError>;

    /// Block until the peer's column arrives. `Ok(None)` means the wait was
    /// canceled and no move is available.
    fn receive_column(&mut self) -> Result<Option<usize>, NetworkError>;
}

/// Shared flag that stops a pending connect, accept or receive.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Encode a column as its ASCII digit.
pub fn encode_column(column: usize) -> Result<u8, NetworkError> {
    if column > 9 {
        return Err(NetworkError::ColumnOutOfRange(column));
    }
    Ok(b'0' + column as u8)
}

/// Decode an ASCII digit. Anything else is a protocol error.
pub fn decode_column(byte: u8) -> Result<usize, NetworkError> {
    if byte.is_ascii_digit() {
        Ok((byte - b'0') as usize)
    } else {
        Err(NetworkError::Malformed(byte))
    }
}
