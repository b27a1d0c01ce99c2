//! VBus wire protocol
//!
//! Message layout on the wire (all multi-byte fields little-endian):
//!
//! ```text
//! 0xAA | dst lo dst hi | src lo src hi | ver | cmd lo cmd hi | frames | csum
//!      | frame 0 (6 bytes) | frame 1 | ... | frame frames-1
//! ```
//!
//! Each frame carries four payload bytes with their MSB stripped, a septet
//! byte holding the stripped bits, and a checksum.
//!
//! The SYNC byte never appears inside a well-formed message because every
//! other byte has its MSB cleared. Rejected messages are skipped by scanning
//! for the next SYNC byte rather than by parsing their length.

pub mod frame;
pub mod header;
pub mod reader;
pub mod sync;

pub use frame::{decode_frame, encode_frame, encode_payload, receive_payload};
pub use header::{encode_header, HeaderPart1, HeaderPart2, ProtocolVersion};
pub use reader::{read_reading, HeaderFilter, ReadOptions};
pub use sync::scan_for_sync;

/// Start-of-message delimiter
pub const SYNC_BYTE: u8 = 0xAA;

/// VBus protocol 1.0 checksum
///
/// Starts at 0x7F and subtracts every covered byte, keeping 7 bits.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0x7F_u8, |crc, &b| crc.wrapping_sub(b) & 0x7F)
}

/// Encode a complete protocol 1.0 message: header followed by its frames
///
/// The frame count is derived from the payload length (rounded up to whole
/// frames). Payloads longer than 255 frames are cut at 255 frames.
pub fn encode_message(part1: &HeaderPart1, command: u16, payload: &[u8]) -> Vec<u8> {
    let max_len = usize::from(u8::MAX) * frame::FRAME_PAYLOAD_LEN;
    let payload = &payload[..payload.len().min(max_len)];
    let frame_count = payload.len().div_ceil(frame::FRAME_PAYLOAD_LEN) as u8;

    let mut out = encode_header(part1, command, frame_count).to_vec();
    out.extend_from_slice(&encode_payload(payload));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(checksum(&[]), 0x7F);
    }

    #[test]
    fn test_checksum_known_header() {
        // 10 00 22 11 10 00 01 0A
        let covered = [0x10, 0x00, 0x22, 0x11, 0x10, 0x00, 0x01, 0x0A];
        let sum: u32 = covered.iter().map(|&b| b as u32).sum();
        let expected = (0x7F_u32.wrapping_sub(sum) & 0x7F) as u8;
        assert_eq!(checksum(&covered), expected);
    }

    #[test]
    fn test_encode_message_layout() {
        let part1 = HeaderPart1 {
            destination: 0x0010,
            source: 0x1122,
            version: ProtocolVersion::V1_0,
        };
        let raw = encode_message(&part1, 0x0100, &[0x80; 5]);

        assert_eq!(raw.len(), 10 + 2 * 6);
        assert_eq!(raw[0], SYNC_BYTE);
        assert_eq!(raw[8], 2);
        // SYNC never recurs inside an encoded message
        assert!(raw[1..].iter().all(|&b| b < 0x80));
    }

    #[test]
    fn test_checksum_always_seven_bit() {
        assert!(checksum(&[0xFF, 0xFF, 0xFF]) < 0x80);
    }
}
