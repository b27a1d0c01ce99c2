//! Read cycle: sync, header, filter, frames, decode
//!
//! Runs until the first message matching the filter has been decoded.
//! A rejected header is dropped right after part 1; the rest of that
//! message is left unread and skipped by the next SYNC scan.

use super::frame::receive_payload;
use super::header::{self, HeaderPart1, ProtocolVersion};
use super::sync::scan_for_sync;
use crate::constants::{DELTASOL_CS4_ADDRESS, DFA_ADDRESS, STATUS_COMMAND};
use crate::device::deltasol_cs4::{self, Reading};
use crate::error::{Result, VbusError};
use crate::logging::{hex_dump, LogSink};
use crate::transport::VbusStream;
use std::io::{Read, Write};

/// Which messages are decoded; everything else is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFilter {
    pub destination: u16,
    pub source: u16,
    pub version: ProtocolVersion,
}

impl Default for HeaderFilter {
    fn default() -> Self {
        Self {
            destination: DFA_ADDRESS,
            source: DELTASOL_CS4_ADDRESS,
            version: ProtocolVersion::V1_0,
        }
    }
}

impl HeaderFilter {
    pub fn matches(&self, header: &HeaderPart1) -> bool {
        header.version == self.version
            && header.destination == self.destination
            && header.source == self.source
    }
}

/// Knobs for one read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub filter: HeaderFilter,
    /// Non-SYNC bytes that may be skipped per scan (`None` = unbounded)
    pub max_sync_bytes: Option<u64>,
    /// Reject header and frame checksum mismatches instead of ignoring them
    pub verify_checksums: bool,
}

/// Read messages until one matches the filter and decode it
///
/// Any error aborts the cycle; nothing is retried.
pub fn read_reading<S: Read + Write>(
    stream: &mut VbusStream<S>,
    options: &ReadOptions,
    log: &mut dyn LogSink,
) -> Result<Reading> {
    loop {
        scan_for_sync(stream, log, options.max_sync_bytes)?;
        let part1 = header::receive_part1(stream, log)?;

        if !options.filter.matches(&part1) {
            log.log("Not interested, reading next header");
            continue;
        }

        let part2 = header::receive_part2(stream, log)?;
        if options.verify_checksums {
            let expected = part2.expected_checksum(&part1);
            if part2.checksum != expected {
                return Err(VbusError::ChecksumMismatch {
                    what: "header",
                    expected,
                    actual: part2.checksum,
                });
            }
        }
        if part2.command != STATUS_COMMAND {
            log.log(&format!(
                "Unexpected command 0x{:04x}, decoding as status payload",
                part2.command
            ));
        }

        let payload = receive_payload(stream, part2.frame_count, options.verify_checksums)?;
        log.log_lines(&hex_dump(&payload));

        return deltasol_cs4::decode(&payload);
    }
}
