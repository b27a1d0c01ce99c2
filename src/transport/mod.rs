//! Transport layer for byte-level I/O
//!
//! Separates I/O concerns from protocol logic:
//! - **Transport**: exact-length reads, line reads and writes over a stream
//! - **Protocol**: what the bytes mean (handled by `vbus` and `session`)
//!
//! The transport never opens connections itself; it wraps any
//! already-connected `Read + Write` stream. `tcp` provides the connector
//! used by the command-line tool.
//!
//! No timeout is imposed here. A stream with a read timeout configured
//! surfaces expiry as `VbusError::Timeout`.

pub mod tcp;

use crate::error::{Result, VbusError};
use bytes::{Bytes, BytesMut};
use std::io::{self, Read, Write};

/// Blocking byte stream with exact-length reads
///
/// Callers either get exactly the number of bytes they asked for or an
/// error. Partial results are never returned.
#[derive(Debug)]
pub struct VbusStream<S> {
    inner: S,
}

impl<S: Read + Write> VbusStream<S> {
    /// Wrap an already-connected stream
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Block until exactly `n` bytes are read
    ///
    /// # Errors
    ///
    /// - `ConnectionClosed` - stream reported end-of-data first
    /// - `Timeout` - the underlying stream's read timeout expired
    pub fn receive(&mut self, n: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(n);
        self.fill(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Read exactly `N` bytes into a fixed array
    pub fn receive_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read one byte
    pub fn receive_byte(&mut self) -> Result<u8> {
        let [byte] = self.receive_array::<1>()?;
        Ok(byte)
    }

    /// Read one `\n`-terminated line, at most `max_len` bytes
    ///
    /// Reads byte-by-byte so nothing past the terminator is consumed.
    /// The terminator is included in the returned text. End-of-data after
    /// at least one byte returns the partial line.
    pub fn read_line(&mut self, max_len: usize) -> Result<String> {
        let mut line = Vec::with_capacity(64);
        let mut byte = [0u8; 1];

        while line.len() < max_len {
            match self.inner.read(&mut byte) {
                Ok(0) if line.is_empty() => {
                    return Err(VbusError::ConnectionClosed {
                        expected: 1,
                        received: 0,
                    })
                }
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io(e, "reading reply line")),
            }
        }

        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Write all bytes and flush
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.inner
            .write_all(data)
            .and_then(|_| self.inner.flush())
            .map_err(|e| map_io(e, "sending"))
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let expected = buf.len();
        let mut received = 0;

        while received < expected {
            match self.inner.read(&mut buf[received..]) {
                Ok(0) => return Err(VbusError::ConnectionClosed { expected, received }),
                Ok(n) => received += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io(e, "receiving")),
            }
        }
        Ok(())
    }
}

/// Map an I/O error, folding read-timeout kinds into `Timeout`
fn map_io(e: io::Error, context: &'static str) -> VbusError {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => VbusError::Timeout { context },
        _ => VbusError::Io { context, source: e },
    }
}
