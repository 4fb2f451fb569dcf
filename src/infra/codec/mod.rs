//! Byte-level payload writer implementing the NMEA 2000 numeric conventions:
//! little-endian fields, fixed resolutions, and the reserved "not available"
//! and "out of range" encodings each field width carries.
use crate::error::EncodeError;

//==================================================================================SENTINELS

/// In-memory "no valid reading" sentinel for measurement doubles, matching
/// the convention of the reference NMEA2000 stack (`N2kDoubleNA`).
pub const DOUBLE_NA: f64 = -1e9;

/// Raw "not available" encoding for an unsigned byte field.
pub const UINT8_NA: u8 = 0xFF;
/// Raw "out of range" encoding for an unsigned byte field.
pub const UINT8_OUT_OF_RANGE: u8 = 0xFE;
/// Raw "not available" encoding for a signed byte field.
pub const INT8_NA: i8 = 0x7F;

const UINT16_NA: u64 = 0xFFFF;
const UINT16_OUT_OF_RANGE: u64 = 0xFFFE;
const UINT32_NA: u64 = 0xFFFF_FFFF;
const UINT32_OUT_OF_RANGE: u64 = 0xFFFF_FFFE;
const INT16_NA: i64 = 0x7FFF;
const INT16_OUT_OF_RANGE: i64 = 0x7FFE;

/// Whether a measurement double holds an actual reading rather than the
/// not-available sentinel (or garbage such as NaN/infinities).
#[inline]
pub fn is_available(value: f64) -> bool {
    value.is_finite() && value > DOUBLE_NA + 0.5
}

//==================================================================================TO_PAYLOAD
/// Serialize a message structure into a binary payload ready to frame.
/// Implemented by every PGN structure in [`crate::protocol::messages`].
pub trait ToPayload {
    /// Serialize the structure into the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError>;
}

//==================================================================================WRITER
/// Sequential writer laying NMEA 2000 fields into a `&mut [u8]`.
///
/// Scaled-double helpers apply the field resolution, round to the nearest
/// raw step, and fall back to the width-specific not-available / out-of-range
/// encodings when the input is the [`DOUBLE_NA`] sentinel or does not fit.
pub struct PayloadWriter<'a> {
    buffer: &'a mut [u8],
    cursor: usize,
}

impl<'a> PayloadWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// Checks whether anything was written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    fn reserve(&mut self, needed: usize) -> Result<(), EncodeError> {
        if self.cursor + needed > self.buffer.len() {
            return Err(EncodeError::BufferTooSmall {
                needed,
                available: self.buffer.len() - self.cursor,
            });
        }
        Ok(())
    }

    /// Write a raw unsigned byte.
    pub fn u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.reserve(1)?;
        self.buffer[self.cursor] = value;
        self.cursor += 1;
        Ok(())
    }

    /// Write a raw signed byte (two's complement).
    pub fn i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.u8(value as u8)
    }

    /// Write a raw 16-bit field, little-endian.
    pub fn u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.reserve(2)?;
        self.buffer[self.cursor..self.cursor + 2].copy_from_slice(&value.to_le_bytes());
        self.cursor += 2;
        Ok(())
    }

    /// Write a raw 32-bit field, little-endian.
    pub fn u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.reserve(4)?;
        self.buffer[self.cursor..self.cursor + 4].copy_from_slice(&value.to_le_bytes());
        self.cursor += 4;
        Ok(())
    }

    /// Fill `count` reserved bytes with `0xFF`.
    pub fn reserved(&mut self, count: usize) -> Result<(), EncodeError> {
        self.reserve(count)?;
        self.buffer[self.cursor..self.cursor + count].fill(0xFF);
        self.cursor += count;
        Ok(())
    }

    /// Write an unsigned 16-bit scaled double.
    pub fn u16_udouble(&mut self, value: f64, resolution: f64) -> Result<(), EncodeError> {
        let raw = scale_unsigned(value, resolution, UINT16_NA, UINT16_OUT_OF_RANGE);
        self.u16(raw as u16)
    }

    /// Write a signed 16-bit scaled double.
    pub fn i16_double(&mut self, value: f64, resolution: f64) -> Result<(), EncodeError> {
        let raw = scale_signed(value, resolution, INT16_NA, INT16_OUT_OF_RANGE);
        self.u16(raw as i16 as u16)
    }

    /// Write an unsigned 32-bit scaled double.
    pub fn u32_udouble(&mut self, value: f64, resolution: f64) -> Result<(), EncodeError> {
        let raw = scale_unsigned(value, resolution, UINT32_NA, UINT32_OUT_OF_RANGE);
        self.u32(raw as u32)
    }
}

/// Scale an unsigned double to its raw representation. The raw value must
/// stay strictly below the out-of-range sentinel to remain valid.
fn scale_unsigned(value: f64, resolution: f64, na: u64, out_of_range: u64) -> u64 {
    if !is_available(value) {
        return na;
    }
    let scaled = value / resolution + 0.5;
    if scaled < 0.0 || scaled >= out_of_range as f64 {
        return out_of_range;
    }
    scaled as u64
}

/// Scale a signed double to its raw representation (round half away from
/// zero, the behavior of the reference stack).
fn scale_signed(value: f64, resolution: f64, na: i64, out_of_range: i64) -> i64 {
    if !is_available(value) {
        return na;
    }
    let scaled = value / resolution;
    let rounded = if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    };
    if rounded <= -(out_of_range as f64) || rounded >= out_of_range as f64 {
        return out_of_range;
    }
    rounded as i64
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
