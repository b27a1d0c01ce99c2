//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default TCP control port of the KM2 gateway
pub const DEFAULT_PORT: u16 = 7053;

/// Maximum length of one login reply line (bytes)
pub const MAX_REPLY_LINE: usize = 1024;

// =============================================================================
// Login protocol
// =============================================================================

/// Only accepted reply to the `PASS` command
pub const LOGIN_OK_REPLY: &str = "+OK";

/// Request that switches the gateway into binary data mode
pub const DATA_REQUEST: &str = "DATA";

// =============================================================================
// VBus addressing
// =============================================================================

/// DFA (display / data logger) bus address
pub const DFA_ADDRESS: u16 = 0x0010;

/// DeltaSol CS4 controller bus address
pub const DELTASOL_CS4_ADDRESS: u16 = 0x1122;

/// Controller status command carrying the sensor payload
pub const STATUS_COMMAND: u16 = 0x0100;
