use super::codec::{self, RecordReader, RecordWriter};
use crate::types::Beacon;

pub const RECORD_LENGTH: usize = 32;

pub const EXTENDED_ID_OFFSET: usize = 0;
pub const TIMESTAMP_OFFSET: usize = 4;
pub const LATITUDE_OFFSET: usize = 8;
pub const LONGITUDE_OFFSET: usize = 12;
pub const ALTITUDE_OFFSET: usize = 16;
pub const CLIMB_RATE_OFFSET: usize = 18;
pub const GROUND_SPEED_OFFSET: usize = 20;
pub const TRACK_OFFSET: usize = 22;
pub const TURN_RATE_OFFSET: usize = 24;
pub const AIRCRAFT_TYPE_OFFSET: usize = 26;
pub const ERROR_COUNT_OFFSET: usize = 27;
pub const RESERVED_OFFSET: usize = 28;

/// One FR24 datagram payload. Built once per beacon and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRecord([u8; RECORD_LENGTH]);

impl EncodedRecord {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; RECORD_LENGTH] {
        &self.0
    }

    #[must_use]
    pub fn fields(&self) -> RecordFields {
        let reader = RecordReader::new(&self.0);
        RecordFields {
            extended_id: reader.u32_at(EXTENDED_ID_OFFSET),
            timestamp: reader.u32_at(TIMESTAMP_OFFSET),
            latitude: reader.i32_at(LATITUDE_OFFSET),
            longitude: reader.i32_at(LONGITUDE_OFFSET),
            altitude: reader.i16_at(ALTITUDE_OFFSET),
            climb_rate: reader.i16_at(CLIMB_RATE_OFFSET),
            ground_speed: reader.i16_at(GROUND_SPEED_OFFSET),
            track: reader.i16_at(TRACK_OFFSET),
            turn_rate: reader.i16_at(TURN_RATE_OFFSET),
            aircraft_type: reader.u8_at(AIRCRAFT_TYPE_OFFSET),
            error_count: reader.u8_at(ERROR_COUNT_OFFSET),
            horizontal_accuracy: reader.u8_at(RESERVED_OFFSET),
            vertical_accuracy: reader.u8_at(RESERVED_OFFSET + 1),
            movement_mode: reader.u8_at(RESERVED_OFFSET + 2),
            flags: reader.u8_at(RESERVED_OFFSET + 3),
        }
    }
}

/// Decoded view of an [`EncodedRecord`], in wire units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFields {
    pub extended_id: u32,
    pub timestamp: u32,
    pub latitude: i32,
    pub longitude: i32,
    pub altitude: i16,
    pub climb_rate: i16,
    pub ground_speed: i16,
    pub track: i16,
    pub turn_rate: i16,
    pub aircraft_type: u8,
    pub error_count: u8,
    pub horizontal_accuracy: u8,
    pub vertical_accuracy: u8,
    pub movement_mode: u8,
    pub flags: u8,
}

impl std::fmt::Display for RecordFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id={:08X} t={} lat={} lon={} alt={} climb={} speed={} track={} turn={} type={} err={}",
            self.extended_id,
            self.timestamp,
            self.latitude,
            self.longitude,
            self.altitude,
            self.climb_rate,
            self.ground_speed,
            self.track,
            self.turn_rate,
            self.aircraft_type,
            self.error_count
        )
    }
}

/// Encodes `beacon` stamped with `now_seconds` (Unix time of the send, not
/// of the beacon).
///
/// `send_descriptor` selects the metadata path. The current FR24 protocol
/// resolves aircraft metadata on its own, so both paths produce the same
/// bytes.
#[must_use]
pub fn encode(beacon: &Beacon, send_descriptor: bool, now_seconds: i64) -> EncodedRecord {
    if send_descriptor {
        encode_with_descriptor(beacon, now_seconds)
    } else {
        encode_position(beacon, now_seconds)
    }
}

// Extension point: descriptor fields go here once the receiver accepts them.
fn encode_with_descriptor(beacon: &Beacon, now_seconds: i64) -> EncodedRecord {
    encode_position(beacon, now_seconds)
}

fn encode_position(beacon: &Beacon, now_seconds: i64) -> EncodedRecord {
    let mut bytes = [0u8; RECORD_LENGTH];
    let mut writer = RecordWriter::new(&mut bytes);
    writer
        .put_u32(codec::extended_id(
            beacon.address,
            beacon.address_type,
            beacon.aircraft_type,
        ))
        .put_u32(codec::epoch_seconds(now_seconds))
        .put_i32(codec::degrees_e7(beacon.latitude))
        .put_i32(codec::degrees_e7(beacon.longitude))
        .put_i16(codec::altitude_meters(beacon.altitude))
        .put_i16(codec::climb_rate_tenths(beacon.climb_rate))
        .put_i16(codec::ground_speed_tenths(beacon.ground_speed))
        .put_i16(codec::angle_units(beacon.track))
        .put_i16(codec::angle_units(beacon.turn_rate))
        .put_u8(beacon.aircraft_type.code())
        .put_u8(codec::error_count(beacon.error_count))
        // horizontal accuracy, vertical accuracy, movement mode, flags
        .put_u8(0)
        .put_u8(0)
        .put_u8(0)
        .put_u8(0);
    debug_assert_eq!(writer.position(), RECORD_LENGTH);
    EncodedRecord(bytes)
}
