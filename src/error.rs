//! Centralized error types for the reader
//!
//! All reader errors are represented by the `VbusError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, VbusError>`.

use std::fmt;
use std::path::PathBuf;

/// All reader errors
#[derive(Debug)]
pub enum VbusError {
    // === Transport ===
    /// Stream ended before the requested byte count arrived
    ConnectionClosed { expected: usize, received: usize },
    /// Read or write on the stream failed
    Io {
        context: &'static str,
        source: std::io::Error,
    },
    /// Configured read timeout elapsed
    Timeout { context: &'static str },
    /// Failed to connect to the gateway
    Connect {
        addr: String,
        source: std::io::Error,
    },

    // === Login ===
    /// `PASS` reply was not `+OK`
    AuthenticationError { reply: String },
    /// Reading attempted before the login handshake completed
    NotAuthenticated,

    // === Protocol ===
    /// Version byte not in the known lookup
    UnknownProtocolVersion { byte: u8 },
    /// Configured sync scan bound hit before a SYNC byte was seen
    SyncLimitExceeded { scanned: u64 },
    /// Checksum mismatch (only raised when verification is enabled)
    ChecksumMismatch {
        what: &'static str,
        expected: u8,
        actual: u8,
    },
    /// Payload shorter than the device layout requires
    TruncatedPayload { required: usize, actual: usize },

    // === Config ===
    /// Failed to read the config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
}

impl std::error::Error for VbusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. }
            | Self::Connect { source, .. }
            | Self::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for VbusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionClosed { expected, received } => write!(
                f,
                "Connection closed after {} of {} bytes",
                received, expected
            ),
            Self::Io { context, source } => write!(f, "IO error while {}: {}", context, source),
            Self::Timeout { context } => write!(f, "Timed out while {}", context),
            Self::Connect { addr, .. } => write!(f, "Cannot connect to {}", addr),
            Self::AuthenticationError { reply } => {
                write!(f, "Authentication failed: gateway replied {:?}", reply)
            }
            Self::NotAuthenticated => write!(f, "Session is not authenticated"),
            Self::UnknownProtocolVersion { byte } => {
                write!(f, "Unknown protocol version byte 0x{:02x}", byte)
            }
            Self::SyncLimitExceeded { scanned } => {
                write!(f, "No SYNC byte found within {} bytes", scanned)
            }
            Self::ChecksumMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{} checksum mismatch: expected 0x{:02x}, got 0x{:02x}",
                what, expected, actual
            ),
            Self::TruncatedPayload { required, actual } => write!(
                f,
                "Payload too short: {} bytes (need {})",
                actual, required
            ),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with VbusError
pub type Result<T> = std::result::Result<T, VbusError>;
