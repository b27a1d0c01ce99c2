//! Resol VBus reader for KM2 gateways
//!
//! Logs in to a KM2 over TCP, waits for the first DeltaSol CS4 status
//! message on the bus and decodes it into a [`device::Reading`].
//!
//! - `transport` - exact-length reads over a connected stream, TCP connector
//! - `session` - login handshake and read cycle entry point
//! - `vbus` - SYNC scan, headers, septet frames
//! - `device` - payload layouts

pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod logging;
pub mod report;
pub mod session;
pub mod transport;
pub mod vbus;

pub use device::Reading;
pub use error::{Result, VbusError};
pub use session::Session;
