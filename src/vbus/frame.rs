//! Payload frames and septet encoding
//!
//! ```text
//! i + 0  payload byte 0, MSB moved to septet bit 0
//! i + 1  payload byte 1, MSB moved to septet bit 1
//! i + 2  payload byte 2, MSB moved to septet bit 2
//! i + 3  payload byte 3, MSB moved to septet bit 3
//! i + 4  septet byte
//! i + 5  checksum over i + 0 ..= i + 4
//! ```

use super::checksum;
use crate::error::{Result, VbusError};
use crate::transport::VbusStream;
use bytes::{Bytes, BytesMut};
use std::io::{Read, Write};

pub const FRAME_LEN: usize = 6;
pub const FRAME_PAYLOAD_LEN: usize = 4;

const SEPTET_OFFSET: usize = 4;
const CHECKSUM_OFFSET: usize = 5;

/// Restore the four payload bytes of an encoded frame
///
/// Septet bit `i` sets bit 7 of payload byte `i`. Septet bits 4..=7 are
/// ignored. The checksum byte is not inspected.
pub fn decode_frame(raw: &[u8; FRAME_LEN]) -> [u8; FRAME_PAYLOAD_LEN] {
    let septet = raw[SEPTET_OFFSET];
    let mut out = [0u8; FRAME_PAYLOAD_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = raw[i];
        if septet & (1 << i) != 0 {
            *byte |= 0x80;
        }
    }
    out
}

/// Encode four payload bytes into a frame with septet and checksum
pub fn encode_frame(payload: &[u8; FRAME_PAYLOAD_LEN]) -> [u8; FRAME_LEN] {
    let mut out = [0u8; FRAME_LEN];
    let mut septet = 0u8;
    for (i, &byte) in payload.iter().enumerate() {
        if byte & 0x80 != 0 {
            septet |= 1 << i;
        }
        out[i] = byte & 0x7F;
    }
    out[SEPTET_OFFSET] = septet;
    out[CHECKSUM_OFFSET] = checksum(&out[..CHECKSUM_OFFSET]);
    out
}

/// Encode a whole payload, zero-padding the last frame
pub fn encode_payload(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len().div_ceil(FRAME_PAYLOAD_LEN) * FRAME_LEN);
    for chunk in payload.chunks(FRAME_PAYLOAD_LEN) {
        let mut block = [0u8; FRAME_PAYLOAD_LEN];
        block[..chunk.len()].copy_from_slice(chunk);
        out.extend_from_slice(&encode_frame(&block));
    }
    out
}

/// Read one frame and restore its payload bytes
pub fn receive_frame<S: Read + Write>(
    stream: &mut VbusStream<S>,
    verify_checksum: bool,
) -> Result<[u8; FRAME_PAYLOAD_LEN]> {
    let raw = stream.receive_array::<FRAME_LEN>()?;

    if verify_checksum {
        let expected = checksum(&raw[..CHECKSUM_OFFSET]);
        if raw[CHECKSUM_OFFSET] != expected {
            return Err(VbusError::ChecksumMismatch {
                what: "frame",
                expected,
                actual: raw[CHECKSUM_OFFSET],
            });
        }
    }

    Ok(decode_frame(&raw))
}

/// Read exactly `frame_count` frames and concatenate their payloads in order
///
/// The result is always `4 * frame_count` bytes long.
pub fn receive_payload<S: Read + Write>(
    stream: &mut VbusStream<S>,
    frame_count: u8,
    verify_checksum: bool,
) -> Result<Bytes> {
    let mut payload = BytesMut::with_capacity(usize::from(frame_count) * FRAME_PAYLOAD_LEN);
    for _ in 0..frame_count {
        payload.extend_from_slice(&receive_frame(stream, verify_checksum)?);
    }
    Ok(payload.freeze())
}
