use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{decode_column, encode_column, CancelToken, Peer};
use crate::config::NetworkConfig;
use crate::error::NetworkError;

fn is_timeout(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

/// An established connection to the other player.
#[derive(Debug)]
pub struct TcpPeer {
    stream: TcpStream,
    cancel: CancelToken,
}

impl TcpPeer {
    fn new(stream: TcpStream, poll_interval: Duration, cancel: CancelToken) -> Result<Self, NetworkError> {
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        // Reads wake up this often to look at the cancel flag.
        stream.set_read_timeout(Some(poll_interval))?;
        Ok(TcpPeer { stream, cancel })
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.stream.peer_addr()?)
    }

    /// Token that cancels a pending [`Peer::receive_column`].
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Peer for TcpPeer {
    fn send_column(&mut self, column: usize) -> Result<(), NetworkError> {
        let byte = encode_column(column)?;
        self.stream.write_all(&[byte])?;
        self.stream.flush()?;
        tracing::debug!(column, "sent move");
        Ok(())
    }

    fn receive_column(&mut self) -> Result<Option<usize>, NetworkError> {
        let mut buf = [0u8; 1];
        loop {
            if self.cancel.is_canceled() {
                return Ok(None);
            }
            match self.stream.read(&mut buf) {
                Ok(0) => return Err(NetworkError::Disconnected),
                Ok(_) => {
                    let column = decode_column(buf[0])?;
                    tracing::debug!(column, "received move");
                    return Ok(Some(column));
                }
                Err(e) if is_timeout(e.kind()) || e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Listening socket of the hosting player.
#[derive(Debug)]
pub struct HostListener {
    listener: TcpListener,
    poll_interval: Duration,
}

impl HostListener {
    /// Listen on all interfaces at the configured port. Port 0 picks a free one.
    pub fn bind(config: &NetworkConfig) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(("0.0.0.0", config.port))?;
        listener.set_nonblocking(true)?;
        tracing::info!(addr = %listener.local_addr()?, "waiting for opponent");
        Ok(HostListener {
            listener,
            poll_interval: config.poll_interval(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// Wait for the joining player. `Ok(None)` when canceled first.
    pub fn accept(&self, cancel: &CancelToken) -> Result<Option<TcpPeer>, NetworkError> {
        loop {
            if cancel.is_canceled() {
                tracing::info!("hosting canceled");
                return Ok(None);
            }
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::info!(%addr, "opponent connected");
                    return TcpPeer::new(stream, self.poll_interval, cancel.clone()).map(Some);
                }
                Err(e) if is_timeout(e.kind()) => std::thread::sleep(self.poll_interval),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn resolve(address: &str, port: u16) -> Result<SocketAddr, NetworkError> {
    if let Ok(addr) = address.parse::<SocketAddr>() {
        return Ok(addr);
    }
    (address, port)
        .to_socket_addrs()?
        .next()
        .ok_or(NetworkError::NotConnected)
}

/// Connect to a hosting player, retrying until it accepts or `cancel` fires.
///
/// `address` is an IP or host name, with an optional `:port` overriding the
/// configured one.
pub fn connect(
    address: &str,
    config: &NetworkConfig,
    cancel: &CancelToken,
) -> Result<Option<TcpPeer>, NetworkError> {
    let addr = resolve(address, config.port)?;
    let poll_interval = config.poll_interval();
    loop {
        if cancel.is_canceled() {
            tracing::info!(%addr, "join canceled");
            return Ok(None);
        }
        match TcpStream::connect_timeout(&addr, poll_interval) {
            Ok(stream) => {
                tracing::info!(%addr, "joined game");
                return TcpPeer::new(stream, poll_interval, cancel.clone()).map(Some);
            }
            Err(e) if is_timeout(e.kind()) || e.kind() == ErrorKind::ConnectionRefused => {
                tracing::debug!(%addr, error = %e, "host not reachable yet");
                std::thread::sleep(poll_interval);
            }
            Err(e) => return Err(e.into()),
        }
    }
}
