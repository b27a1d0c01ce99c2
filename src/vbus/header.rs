//! VBus message headers
//!
//! Part 1 (5 bytes after SYNC) is shared by all protocol versions:
//! destination, source, version. Part 2 (4 bytes) is protocol 1.0 specific:
//! command, frame count, checksum over header offsets 1..=8.

use super::checksum;
use crate::error::{Result, VbusError};
use crate::logging::LogSink;
use crate::transport::VbusStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};

pub const HEADER_PART1_LEN: usize = 5;
pub const HEADER_PART2_LEN: usize = 4;

/// VBus protocol version, carried in the last byte of header part 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "2.0")]
    V2_0,
    #[serde(rename = "3.0")]
    V3_0,
    #[serde(rename = "3.1")]
    V3_1,
}

impl ProtocolVersion {
    /// Look up a version byte
    ///
    /// # Errors
    ///
    /// `UnknownProtocolVersion` for any byte outside 0x10/0x20/0x30/0x31.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x10 => Ok(Self::V1_0),
            0x20 => Ok(Self::V2_0),
            0x30 => Ok(Self::V3_0),
            0x31 => Ok(Self::V3_1),
            _ => Err(VbusError::UnknownProtocolVersion { byte }),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::V1_0 => 0x10,
            Self::V2_0 => 0x20,
            Self::V3_0 => 0x30,
            Self::V3_1 => 0x31,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V2_0 => "2.0",
            Self::V3_0 => "3.0",
            Self::V3_1 => "3.1",
        }
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = VbusError;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addressing part of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPart1 {
    pub destination: u16,
    pub source: u16,
    pub version: ProtocolVersion,
}

impl HeaderPart1 {
    pub fn decode(raw: &[u8; HEADER_PART1_LEN]) -> Result<Self> {
        Ok(Self {
            destination: u16::from_le_bytes([raw[0], raw[1]]),
            source: u16::from_le_bytes([raw[2], raw[3]]),
            version: ProtocolVersion::from_byte(raw[4])?,
        })
    }

    pub fn encode(&self) -> [u8; HEADER_PART1_LEN] {
        let [d0, d1] = self.destination.to_le_bytes();
        let [s0, s1] = self.source.to_le_bytes();
        [d0, d1, s0, s1, self.version.to_byte()]
    }
}

/// Command part of the header (protocol 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPart2 {
    pub command: u16,
    pub frame_count: u8,
    /// Carried as received, not validated unless verification is enabled
    pub checksum: u8,
}

impl HeaderPart2 {
    pub fn decode(raw: &[u8; HEADER_PART2_LEN]) -> Self {
        Self {
            command: u16::from_le_bytes([raw[0], raw[1]]),
            frame_count: raw[2],
            checksum: raw[3],
        }
    }

    /// Decoded payload length in bytes
    pub fn payload_len(&self) -> usize {
        usize::from(self.frame_count) * super::frame::FRAME_PAYLOAD_LEN
    }

    /// Checksum the header should carry, given the part 1 it followed
    pub fn expected_checksum(&self, part1: &HeaderPart1) -> u8 {
        let [c0, c1] = self.command.to_le_bytes();
        let mut covered = [0u8; HEADER_PART1_LEN + 3];
        covered[..HEADER_PART1_LEN].copy_from_slice(&part1.encode());
        covered[HEADER_PART1_LEN..].copy_from_slice(&[c0, c1, self.frame_count]);
        checksum(&covered)
    }
}

/// Encode a complete protocol 1.0 header including SYNC and checksum
pub fn encode_header(part1: &HeaderPart1, command: u16, frame_count: u8) -> [u8; 10] {
    let mut part2 = HeaderPart2 {
        command,
        frame_count,
        checksum: 0,
    };
    part2.checksum = part2.expected_checksum(part1);

    let [c0, c1] = command.to_le_bytes();
    let mut out = [0u8; 10];
    out[0] = super::SYNC_BYTE;
    out[1..6].copy_from_slice(&part1.encode());
    out[6..].copy_from_slice(&[c0, c1, frame_count, part2.checksum]);
    out
}

/// Read and decode header part 1 (call right after a SYNC match)
pub fn receive_part1<S: Read + Write>(
    stream: &mut VbusStream<S>,
    log: &mut dyn LogSink,
) -> Result<HeaderPart1> {
    let raw = stream.receive_array::<HEADER_PART1_LEN>()?;
    let header = HeaderPart1::decode(&raw)?;

    log.log(&format!("Destination 0x{:04x}", header.destination));
    log.log(&format!("Source 0x{:04x}", header.source));
    log.log(&format!("Protocol version {}", header.version));
    Ok(header)
}

/// Read and decode header part 2
pub fn receive_part2<S: Read + Write>(
    stream: &mut VbusStream<S>,
    log: &mut dyn LogSink,
) -> Result<HeaderPart2> {
    let raw = stream.receive_array::<HEADER_PART2_LEN>()?;
    let header = HeaderPart2::decode(&raw);

    log.log(&format!(
        "command=0x{:04x} frames={}",
        header.command, header.frame_count
    ));
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogStore;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_version_lookup() {
        assert_eq!(ProtocolVersion::from_byte(0x10).unwrap(), ProtocolVersion::V1_0);
        assert_eq!(ProtocolVersion::from_byte(0x20).unwrap(), ProtocolVersion::V2_0);
        assert_eq!(ProtocolVersion::from_byte(0x30).unwrap(), ProtocolVersion::V3_0);
        assert_eq!(ProtocolVersion::from_byte(0x31).unwrap(), ProtocolVersion::V3_1);
    }

    #[test]
    fn test_unknown_version_is_typed_error() {
        match ProtocolVersion::from_byte(0x40) {
            Err(VbusError::UnknownProtocolVersion { byte }) => assert_eq!(byte, 0x40),
            other => panic!("Expected UnknownProtocolVersion, got {:?}", other),
        }
        assert!(ProtocolVersion::try_from(0x00u8).is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(ProtocolVersion::V3_1.to_string(), "3.1");
    }

    #[test]
    fn test_decode_part1() {
        let header = HeaderPart1::decode(&[0x10, 0x00, 0x22, 0x11, 0x10]).unwrap();
        assert_eq!(header.destination, 0x0010);
        assert_eq!(header.source, 0x1122);
        assert_eq!(header.version, ProtocolVersion::V1_0);
    }

    #[test]
    fn test_decode_part2() {
        let header = HeaderPart2::decode(&[0x00, 0x01, 0x0A, 0x5B]);
        assert_eq!(header.command, 0x0100);
        assert_eq!(header.frame_count, 10);
        assert_eq!(header.checksum, 0x5B);
        assert_eq!(header.payload_len(), 40);
    }

    #[test]
    fn test_frame_count_is_unsigned() {
        let header = HeaderPart2::decode(&[0x00, 0x01, 0xFF, 0x00]);
        assert_eq!(header.frame_count, 255);
        assert_eq!(header.payload_len(), 1020);
    }

    #[test]
    fn test_encode_header_layout() {
        let part1 = HeaderPart1 {
            destination: 0x0010,
            source: 0x1122,
            version: ProtocolVersion::V1_0,
        };
        let raw = encode_header(&part1, 0x0100, 10);
        assert_eq!(&raw[..9], &[0xAA, 0x10, 0x00, 0x22, 0x11, 0x10, 0x00, 0x01, 0x0A]);
        assert_eq!(raw[9], checksum(&raw[1..9]));

        let part2 = HeaderPart2::decode(&[raw[6], raw[7], raw[8], raw[9]]);
        assert_eq!(part2.checksum, part2.expected_checksum(&part1));
    }

    #[test]
    fn test_receive_part1_logs_fields() {
        let mut stream = VbusStream::new(Cursor::new(vec![0x10, 0x00, 0x22, 0x11, 0x10]));
        let mut log = LogStore::new(16);
        let header = receive_part1(&mut stream, &mut log).unwrap();

        assert_eq!(header.source, 0x1122);
        assert_eq!(
            log.messages(),
            vec!["Destination 0x0010", "Source 0x1122", "Protocol version 1.0"]
        );
    }

    #[test]
    fn test_receive_part1_truncated() {
        let mut stream = VbusStream::new(Cursor::new(vec![0x10, 0x00]));
        let mut log = LogStore::new(16);
        assert!(matches!(
            receive_part1(&mut stream, &mut log),
            Err(VbusError::ConnectionClosed { expected: 5, received: 2 })
        ));
    }

    proptest! {
        #[test]
        fn prop_addresses_round_trip(
            destination in any::<u16>(),
            source in any::<u16>(),
            version in prop::sample::select(vec![0x10u8, 0x20, 0x30, 0x31]),
        ) {
            let [d0, d1] = destination.to_le_bytes();
            let [s0, s1] = source.to_le_bytes();
            let raw = [d0, d1, s0, s1, version];

            let header = HeaderPart1::decode(&raw).unwrap();
            prop_assert_eq!(header.destination, destination);
            prop_assert_eq!(header.source, source);
            prop_assert_eq!(header.encode(), raw);
        }

        #[test]
        fn prop_unknown_version_never_panics(byte in any::<u8>()) {
            let known = matches!(byte, 0x10 | 0x20 | 0x30 | 0x31);
            prop_assert_eq!(ProtocolVersion::from_byte(byte).is_ok(), known);
        }
    }
}
