//! Configuration management
//!
//! Optional TOML file passed with `--config`. Every section and field has
//! a default, so partial files work. Command-line values override the file.
//!
//! ```toml
//! [connection]
//! host = "192.168.0.20"
//! port = 7053
//! password = "vbus"
//! read_timeout_ms = 30000
//!
//! [filter]
//! destination = 0x0010
//! source = 0x1122
//! protocol_version = "1.0"
//!
//! [limits]
//! max_sync_bytes = 65536
//! verify_checksums = false
//! ```

use crate::constants::{DEFAULT_PORT, DELTASOL_CS4_ADDRESS, DFA_ADDRESS};
use crate::error::{Result, VbusError};
use crate::transport::tcp::TcpOptions;
use crate::vbus::{HeaderFilter, ProtocolVersion, ReadOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub filter: FilterConfig,
    pub limits: LimitsConfig,
}

/// Gateway connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Gateway host name or IP address
    pub host: String,
    /// Gateway control port
    pub port: u16,
    /// Gateway password
    pub password: String,
    /// Connect timeout (unset = OS default)
    pub connect_timeout_ms: Option<u64>,
    /// Per-read timeout (unset = block forever)
    pub read_timeout_ms: Option<u64>,
}

/// Which bus messages are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub destination: u16,
    pub source: u16,
    pub protocol_version: ProtocolVersion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Bytes skipped per SYNC scan before giving up (unset = unbounded)
    pub max_sync_bytes: Option<u64>,
    /// Reject header/frame checksum mismatches
    pub verify_checksums: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            password: String::new(),
            connect_timeout_ms: None,
            read_timeout_ms: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            destination: DFA_ADDRESS,
            source: DELTASOL_CS4_ADDRESS,
            protocol_version: ProtocolVersion::V1_0,
        }
    }
}

impl Config {
    /// Reject values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.connection.port == 0 {
            return Err(VbusError::ConfigValidation {
                field: "connection.port",
                reason: "must not be 0".into(),
            });
        }
        if self.connection.connect_timeout_ms == Some(0) {
            return Err(VbusError::ConfigValidation {
                field: "connection.connect_timeout_ms",
                reason: "must be positive (omit for no timeout)".into(),
            });
        }
        if self.connection.read_timeout_ms == Some(0) {
            return Err(VbusError::ConfigValidation {
                field: "connection.read_timeout_ms",
                reason: "must be positive (omit for no timeout)".into(),
            });
        }
        // Header part 2 and the frame layout are only decoded for 1.0
        if self.filter.protocol_version != ProtocolVersion::V1_0 {
            return Err(VbusError::ConfigValidation {
                field: "filter.protocol_version",
                reason: format!(
                    "only 1.0 messages can be decoded, got {}",
                    self.filter.protocol_version
                ),
            });
        }
        if self.limits.max_sync_bytes == Some(0) {
            return Err(VbusError::ConfigValidation {
                field: "limits.max_sync_bytes",
                reason: "must be positive (omit for no limit)".into(),
            });
        }
        Ok(())
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            filter: HeaderFilter {
                destination: self.filter.destination,
                source: self.filter.source,
                version: self.filter.protocol_version,
            },
            max_sync_bytes: self.limits.max_sync_bytes,
            verify_checksums: self.limits.verify_checksums,
        }
    }

    pub fn tcp_options(&self) -> TcpOptions {
        TcpOptions {
            connect_timeout: self.connection.connect_timeout_ms.map(Duration::from_millis),
            read_timeout: self.connection.read_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Load config from a TOML file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| VbusError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| VbusError::ConfigValidation {
        field: "config",
        reason: format!("invalid {}: {}", path.display(), e),
    })
}

/// Load config from `path` if given, defaults otherwise
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load(p),
        None => Ok(Config::default()),
    }
}

// ============================================================================
// Tests
// ============================================================================
