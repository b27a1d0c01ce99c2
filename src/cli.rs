//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use crate::config::Config;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Print solar readings from a Resol KM2 / DeltaSol CS4
#[derive(Parser, Debug, Default)]
#[command(name = "vbus-read")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// IP address of the KM2 (overrides config)
    pub ip_address: Option<String>,

    /// Password of the KM2 (overrides config)
    pub password: Option<String>,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// TCP port of the KM2 (default: 7053)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Give up connecting after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout_ms: Option<u64>,

    /// Give up on a silent gateway after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub read_timeout_ms: Option<u64>,

    /// Give up after skipping this many bytes looking for a SYNC byte
    #[arg(long, value_name = "BYTES")]
    pub max_sync_bytes: Option<u64>,

    /// Reject messages whose header or frame checksums do not match
    #[arg(long)]
    pub verify_checksums: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Override config values with those given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.ip_address {
            config.connection.host = host.clone();
        }
        if let Some(password) = &self.password {
            config.connection.password = password.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if self.connect_timeout_ms.is_some() {
            config.connection.connect_timeout_ms = self.connect_timeout_ms;
        }
        if self.read_timeout_ms.is_some() {
            config.connection.read_timeout_ms = self.read_timeout_ms;
        }
        if self.max_sync_bytes.is_some() {
            config.limits.max_sync_bytes = self.max_sync_bytes;
        }
        if self.verify_checksums {
            config.limits.verify_checksums = true;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
