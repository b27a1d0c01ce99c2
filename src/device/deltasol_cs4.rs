//! DeltaSol CS4 status payload (DFA 0x0010 <= 0x1122, command 0x0100)
//!
//! | Offset | Type | Field              | Unit     |
//! |--------|------|--------------------|----------|
//! | 0..8   | i16  | temp sensors 1-4   | 0.1 °C   |
//! | 8      | i8   | pump speed relay 1 | %        |
//! | 10     | u16  | operating hours 1  | h        |
//! | 12     | i8   | pump speed relay 2 | %        |
//! | 14     | u16  | operating hours 2  | h        |
//! | 16     | u8   | unit type          |          |
//! | 17     | u8   | system             |          |
//! | 20     | u16  | error mask         | bits     |
//! | 22     | u16  | system time        | minutes  |
//! | 24     | u32  | status mask        | bits     |
//! | 28     | u32  | heat quantity      | Wh       |
//! | 32     | u16  | firmware version   | 0.01     |
//! | 36     | i16  | temp sensor 5      | 0.1 °C   |
//! | 38     | u16  | flow rate          | l/h      |
//!
//! Offsets 9, 11, 13, 15, 18-19 and 34-35 are padding.

use crate::error::{Result, VbusError};
use bytes::Buf;
use chrono::NaiveTime;

/// Minimum payload length (10 frames)
pub const PAYLOAD_LEN: usize = 40;

const TEMPERATURE_OFFSETS: [usize; 5] = [0, 2, 4, 6, 36];
const PUMP_SPEED_1: usize = 8;
const OPERATING_HOURS_1: usize = 10;
const PUMP_SPEED_2: usize = 12;
const OPERATING_HOURS_2: usize = 14;
const UNIT_TYPE: usize = 16;
const SYSTEM: usize = 17;
const ERROR_MASK: usize = 20;
const SYSTEM_TIME: usize = 22;
const STATUS: usize = 24;
const HEAT_QUANTITY: usize = 28;
const FIRMWARE_VERSION: usize = 32;
const FLOW_RATE: usize = 38;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Decoded controller readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Sensors 1-5 in tenths of a degree Celsius
    pub temperatures_raw: [i16; 5],
    pub pump_speed_1: i8,
    pub operating_hours_1: u16,
    pub pump_speed_2: i8,
    pub operating_hours_2: u16,
    pub unit_type: u8,
    pub system: u8,
    pub error_mask: u16,
    /// Minutes since midnight
    pub system_time: u16,
    pub status: u32,
    /// Watt-hours
    pub heat_quantity: u32,
    /// Hundredths (142 = 1.42)
    pub firmware_version_raw: u16,
    /// Litres per hour
    pub flow_rate: u16,
}

impl Reading {
    /// Temperature of sensor `index` (0-based) in °C
    ///
    /// # Panics
    ///
    /// If `index >= 5`.
    pub fn temperature(&self, index: usize) -> f64 {
        f64::from(self.temperatures_raw[index]) / 10.0
    }

    /// All five temperatures in °C
    pub fn temperatures(&self) -> [f64; 5] {
        self.temperatures_raw.map(|t| f64::from(t) / 10.0)
    }

    /// Sensor 1
    pub fn collector_temperature(&self) -> f64 {
        self.temperature(0)
    }

    /// Sensor 2
    pub fn water_temperature(&self) -> f64 {
        self.temperature(1)
    }

    pub fn firmware_version(&self) -> f64 {
        f64::from(self.firmware_version_raw) / 100.0
    }

    /// System time split into (hours, minutes)
    pub fn clock(&self) -> (u16, u16) {
        (self.system_time / 60, self.system_time % 60)
    }

    /// System time as a time of day, `None` outside 0..=1439 minutes
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        if self.system_time >= MINUTES_PER_DAY {
            return None;
        }
        let (hours, minutes) = self.clock();
        NaiveTime::from_hms_opt(u32::from(hours), u32::from(minutes), 0)
    }

    /// Error mask bits 0-3 flag sensors 1-4 as defective
    pub fn sensor_defective(&self, index: usize) -> bool {
        index < 4 && self.error_mask & (1 << index) != 0
    }
}

/// Decode a DeltaSol CS4 payload
///
/// Bytes beyond the first 40 are ignored.
///
/// # Errors
///
/// `TruncatedPayload` if fewer than 40 bytes are given.
pub fn decode(payload: &[u8]) -> Result<Reading> {
    if payload.len() < PAYLOAD_LEN {
        return Err(VbusError::TruncatedPayload {
            required: PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    Ok(Reading {
        temperatures_raw: TEMPERATURE_OFFSETS.map(|offset| i16_at(payload, offset)),
        pump_speed_1: i8_at(payload, PUMP_SPEED_1),
        operating_hours_1: u16_at(payload, OPERATING_HOURS_1),
        pump_speed_2: i8_at(payload, PUMP_SPEED_2),
        operating_hours_2: u16_at(payload, OPERATING_HOURS_2),
        unit_type: payload[UNIT_TYPE],
        system: payload[SYSTEM],
        error_mask: u16_at(payload, ERROR_MASK),
        system_time: u16_at(payload, SYSTEM_TIME),
        status: u32_at(payload, STATUS),
        heat_quantity: u32_at(payload, HEAT_QUANTITY),
        firmware_version_raw: u16_at(payload, FIRMWARE_VERSION),
        flow_rate: u16_at(payload, FLOW_RATE),
    })
}

// Callers have checked the payload length, so these never run short.

fn i8_at(payload: &[u8], offset: usize) -> i8 {
    (&payload[offset..]).get_i8()
}

fn i16_at(payload: &[u8], offset: usize) -> i16 {
    (&payload[offset..]).get_i16_le()
}

fn u16_at(payload: &[u8], offset: usize) -> u16 {
    (&payload[offset..]).get_u16_le()
}

fn u32_at(payload: &[u8], offset: usize) -> u32 {
    (&payload[offset..]).get_u32_le()
}

/// Payload captured from a KM2 in the field (8:54, pump 100 %)
#[cfg(test)]
pub(crate) const SAMPLE_PAYLOAD: [u8; PAYLOAD_LEN] = [
    0xf9, 0x01, 0x27, 0x01, 0xb8, 0x22, 0xb8, 0x22, // temps 1-4
    0x64, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, // relays
    0x0b, 0x01, 0x00, 0x00, 0x00, 0x00, 0x16, 0x02, // unit, system, errors, time
    0x00, 0x00, 0x00, 0x00, 0x39, 0x30, 0x00, 0x00, // status, heat
    0x8e, 0x00, 0x00, 0x00, 0xb8, 0x22, 0x00, 0x00, // version, temp 5, flow
];
