//! SYNC byte scanning

use super::SYNC_BYTE;
use crate::error::{Result, VbusError};
use crate::logging::LogSink;
use crate::transport::VbusStream;
use std::io::{Read, Write};

/// Consume bytes until the SYNC byte has been read
///
/// Every other byte is logged and discarded. Returns the number of bytes
/// skipped before the SYNC byte.
///
/// `max_skip` is the number of non-SYNC bytes that may be skipped; reading
/// one more fails. `None` scans forever, so a peer that never sends 0xAA
/// blocks the caller indefinitely.
pub fn scan_for_sync<S: Read + Write>(
    stream: &mut VbusStream<S>,
    log: &mut dyn LogSink,
    max_skip: Option<u64>,
) -> Result<u64> {
    log.log("Scanning for SYNC Byte 0xAA");

    let mut skipped: u64 = 0;
    loop {
        let byte = stream.receive_byte()?;
        if byte == SYNC_BYTE {
            log.log("Got SYNC Byte. Reading first part of header");
            return Ok(skipped);
        }

        log.log(&format!("Not SYNC - skipping 0x{:02x}", byte));
        skipped += 1;

        if let Some(limit) = max_skip {
            if skipped > limit {
                return Err(VbusError::SyncLimitExceeded { scanned: skipped });
            }
        }
    }
}
