//! TCP connector for the KM2 gateway
//!
//! Builds the socket with `socket2` so connect timeout, TCP_NODELAY and
//! keepalive can be set before the stream is handed to the core.

use crate::error::{Result, VbusError};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Socket options for the gateway connection
///
/// `None` means no bound, matching a plain blocking socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpOptions {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

/// Connect to `host:port`, trying every resolved address in order
pub fn connect(host: &str, port: u16, options: &TcpOptions) -> Result<TcpStream> {
    let addr = format!("{}:{}", host, port);
    let map_err = |e| VbusError::Connect {
        addr: addr.clone(),
        source: e,
    };

    let resolved = (host, port).to_socket_addrs().map_err(map_err)?;

    let mut last_err = None;
    for candidate in resolved {
        match open(candidate, options) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(map_err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

fn open(addr: SocketAddr, options: &TcpOptions) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nodelay(true)?;
    socket.set_keepalive(true)?;

    match options.connect_timeout {
        Some(timeout) => socket.connect_timeout(&addr.into(), timeout)?,
        None => socket.connect(&addr.into())?,
    }

    socket.set_read_timeout(options.read_timeout)?;
    Ok(socket.into())
}
