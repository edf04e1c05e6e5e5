//! Fixed-point conversions and little-endian packing for the FR24 record.
//!
//! Every conversion truncates toward zero. Floating values are narrowed to
//! `i32` first and only then to the field width, so a value that does not
//! fit a 16-bit field wraps instead of saturating.

use crate::types::{ICAOAddress, OGNAddressType, OGNAircraftType};

const DEGREES_SCALE: f64 = 10_000_000.0;
const TENTHS: f64 = 10.0;
const KMH_PER_MS: f64 = 3.6;
const FULL_CIRCLE: f64 = 360.0;
const ANGLE_UNITS: f64 = 65536.0;

#[must_use]
pub fn extended_id(
    address: ICAOAddress,
    address_type: OGNAddressType,
    aircraft_type: OGNAircraftType,
) -> u32 {
    (address.value() & ICAOAddress::MAX_VALUE)
        | (u32::from(address_type.code()) << 24)
        | (u32::from(aircraft_type.code()) << 26)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn epoch_seconds(seconds: i64) -> u32 {
    seconds as u32
}

/// Degrees to 1e-7 degree units.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn degrees_e7(degrees: f64) -> i32 {
    (degrees * DEGREES_SCALE) as i32
}

#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn altitude_meters(meters: i32) -> i16 {
    meters as i16
}

/// m/s to tenths of m/s.
#[must_use]
pub fn climb_rate_tenths(meters_per_second: f64) -> i16 {
    narrow(meters_per_second * TENTHS)
}

/// km/h to tenths of m/s.
#[must_use]
pub fn ground_speed_tenths(kilometers_per_hour: f64) -> i16 {
    narrow(kilometers_per_hour * TENTHS / KMH_PER_MS)
}

/// Track and turn rate share the receiver's `value * 360 / 65536` scaling.
#[must_use]
pub fn angle_units(value: f64) -> i16 {
    narrow(value * FULL_CIRCLE / ANGLE_UNITS)
}

#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn error_count(count: u32) -> u8 {
    count as u8
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64) -> i16 {
    (value as i32) as i16
}

/// Writes fields back to back, least significant byte first.
pub struct RecordWriter<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> RecordWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        RecordWriter {
            buffer,
            position: 0,
        }
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    pub fn put_i32(&mut self, value: i32) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    pub fn put_i16(&mut self, value: i16) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.put(&[value])
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn put(&mut self, bytes: &[u8]) -> &mut Self {
        let end = self.position + bytes.len();
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
        self
    }
}

/// Reads fields written by [`RecordWriter`] at fixed offsets.
pub struct RecordReader<'a> {
    buffer: &'a [u8],
}

impl<'a> RecordReader<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        RecordReader { buffer }
    }

    #[must_use]
    pub fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.array(offset))
    }

    #[must_use]
    pub fn i32_at(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.array(offset))
    }

    #[must_use]
    pub fn i16_at(&self, offset: usize) -> i16 {
        i16::from_le_bytes(self.array(offset))
    }

    #[must_use]
    pub fn u8_at(&self, offset: usize) -> u8 {
        self.buffer[offset]
    }

    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buffer[offset..offset + N]);
        bytes
    }
}
