//! Packed shot record layout
//!
//! Every shot travels as a fixed 32-byte little-endian record, transcoded to
//! text with [`super::transcoder`] before it is embedded in a session document.
//!
//! ## Record Layout
//!
//! | Offset | Size | Field | Encoding |
//! |---|---|---|---|
//! | 0 | 8 | timestamp | u64, ms since epoch |
//! | 8 | 4 | x | i32, `round(x * 1000)` |
//! | 12 | 4 | y | i32, `round(y * 1000)` |
//! | 16 | 4 | velocity | u32, `round(v * 100)` |
//! | 20 | 1 | temperature | u8 |
//! | 21 | 1 | multi_assign | u8 |
//! | 22 | 1 | error | u8 |
//! | 23 | 9 | reserved | zero |
//!
//! Position values outside the i32 range saturate; negative velocities pack as 0.
//! Quantization loses at most 0.0005 on x/y and 0.005 on velocity.

use super::transcoder::{self, DecodeMode};
use crate::{Result, Shot, ShotFields, ShotMarkerError};

/// Size of a packed shot record in bytes
pub const SHOT_RECORD_SIZE: usize = 32;

const TIMESTAMP_OFFSET: usize = 0;
const X_OFFSET: usize = 8;
const Y_OFFSET: usize = 12;
const VELOCITY_OFFSET: usize = 16;
const TEMPERATURE_OFFSET: usize = 20;
const MULTI_ASSIGN_OFFSET: usize = 21;
const ERROR_OFFSET: usize = 22;

/// Fixed-point scale for x and y
pub const POSITION_SCALE: f64 = 1000.0;
/// Fixed-point scale for velocity
pub const VELOCITY_SCALE: f64 = 100.0;

/// Pack a shot into its 32-byte record.
pub fn pack(shot: &Shot) -> [u8; SHOT_RECORD_SIZE] {
    let mut record = [0u8; SHOT_RECORD_SIZE];

    let x = (shot.x * POSITION_SCALE).round() as i32;
    let y = (shot.y * POSITION_SCALE).round() as i32;
    let velocity = (shot.velocity * VELOCITY_SCALE).round() as u32;

    record[TIMESTAMP_OFFSET..X_OFFSET].copy_from_slice(&shot.timestamp.to_le_bytes());
    record[X_OFFSET..Y_OFFSET].copy_from_slice(&x.to_le_bytes());
    record[Y_OFFSET..VELOCITY_OFFSET].copy_from_slice(&y.to_le_bytes());
    record[VELOCITY_OFFSET..TEMPERATURE_OFFSET].copy_from_slice(&velocity.to_le_bytes());
    record[TEMPERATURE_OFFSET] = shot.temperature;
    record[MULTI_ASSIGN_OFFSET] = shot.multi_assign;
    record[ERROR_OFFSET] = shot.error;

    record
}

/// Unpack the first 32 bytes of `bytes` into a shot.
///
/// Bytes past the record are ignored. Fewer than 32 bytes is a
/// [`ShotMarkerError::TruncatedRecord`].
pub fn unpack(bytes: &[u8]) -> Result<Shot> {
    if bytes.len() < SHOT_RECORD_SIZE {
        return Err(ShotMarkerError::TruncatedRecord {
            expected: SHOT_RECORD_SIZE,
            actual: bytes.len(),
        });
    }

    Ok(Shot {
        timestamp: parse_u64_le(bytes, TIMESTAMP_OFFSET)?,
        x: parse_i32_le(bytes, X_OFFSET)? as f64 / POSITION_SCALE,
        y: parse_i32_le(bytes, Y_OFFSET)? as f64 / POSITION_SCALE,
        velocity: parse_u32_le(bytes, VELOCITY_OFFSET)? as f64 / VELOCITY_SCALE,
        temperature: bytes[TEMPERATURE_OFFSET],
        multi_assign: bytes[MULTI_ASSIGN_OFFSET],
        error: bytes[ERROR_OFFSET],
    })
}

/// Pack and transcode a shot to its stored text form.
pub fn encode(shot: &Shot) -> String {
    transcoder::encode(&pack(shot))
}

/// Decode a stored shot string with strict transcoding.
pub fn decode(encoded: &str) -> Result<Shot> {
    decode_with(encoded, DecodeMode::Strict)
}

/// Decode a stored shot string with the given transcoder strictness.
pub fn decode_with(encoded: &str, mode: DecodeMode) -> Result<Shot> {
    let bytes = transcoder::decode_with(encoded, mode)?;
    unpack(&bytes)
}

impl ShotFields {
    /// Resolve defaults and pack into a 32-byte record.
    pub fn pack(self) -> [u8; SHOT_RECORD_SIZE] {
        pack(&self.into_shot())
    }
}

fn parse_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data.get(offset..offset + 4).ok_or(ShotMarkerError::TruncatedRecord {
        expected: offset + 4,
        actual: data.len(),
    })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn parse_i32_le(data: &[u8], offset: usize) -> Result<i32> {
    parse_u32_le(data, offset).map(|value| value as i32)
}

fn parse_u64_le(data: &[u8], offset: usize) -> Result<u64> {
    let low = parse_u32_le(data, offset)? as u64;
    let high = parse_u32_le(data, offset + 4)? as u64;
    Ok(low | (high << 32))
}
