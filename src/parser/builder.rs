use super::constants::{
    CALLSIGN_DELIMITER, CLIMB_RATE, CLIMB_RATE_REGEX, ERROR_COUNT, ERROR_COUNT_REGEX,
    FEET_PER_MINUTE_TO_MS, FEET_TO_METERS, GPS_ALTITUDE, GPS_DATA_REGEX, GROUND_SPEED,
    GROUND_TRACK, HEADER_BODY_DELIMITER, KNOTS_TO_KMH, LATITUDE_DEGREES, LATITUDE_ENHANCEMENT,
    LATITUDE_HEMISPHERE, LATITUDE_MINUTES, LONGITUDE_DEGREES, LONGITUDE_ENHANCEMENT,
    LONGITUDE_HEMISPHERE, LONGITUDE_MINUTES, OGN_BEACON_ID, OGN_BEACON_ID_REGEX,
    PRECISION_ENHANCEMENT_REGEX, ROT_TO_DEGREES_PER_SECOND, TIME, TURN_RATE, TURN_RATE_REGEX,
};
use super::types::OGNBeaconID;
use crate::types::Beacon;

#[derive(Debug)]
pub enum BeaconBuildError {
    MissingHeaderOrBody(String),
    NotAPosition,
    InvalidFormat(String),
    InvalidTimeFormat(String),
    MissingCapture(String),
    MissingBeaconID,
    InvalidBeaconID(String),
}

impl std::fmt::Display for BeaconBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeaconBuildError::MissingHeaderOrBody(line) => {
                write!(f, "Missing header or body: {line}")
            }
            BeaconBuildError::NotAPosition => write!(f, "Not a position report"),
            BeaconBuildError::InvalidFormat(e) => write!(f, "Invalid format: {e}"),
            BeaconBuildError::InvalidTimeFormat(e) => write!(f, "Invalid time: {e}"),
            BeaconBuildError::MissingCapture(name) => write!(f, "Missing {name}"),
            BeaconBuildError::MissingBeaconID => write!(f, "No aircraft id in comment"),
            BeaconBuildError::InvalidBeaconID(e) => write!(f, "Invalid aircraft id: {e}"),
        }
    }
}

impl std::error::Error for BeaconBuildError {}

/// Builds a [`Beacon`] from one APRS line of the OGN aircraft feed.
pub fn build_beacon_from_string(line: &str) -> Result<Beacon, BeaconBuildError> {
    let (header, body) = line
        .split_once(HEADER_BODY_DELIMITER)
        .ok_or_else(|| BeaconBuildError::MissingHeaderOrBody(line.to_string()))?;
    let (callsign, _path) = header
        .split_once(CALLSIGN_DELIMITER)
        .ok_or_else(|| BeaconBuildError::MissingHeaderOrBody(line.to_string()))?;

    let captures = GPS_DATA_REGEX
        .captures(body)
        .ok_or(BeaconBuildError::NotAPosition)?;

    let time: String = parse_captures(&captures, TIME)?;
    let latitude_degrees: f64 = parse_captures(&captures, LATITUDE_DEGREES)?;
    let latitude_minutes: f64 = parse_captures(&captures, LATITUDE_MINUTES)?;
    let latitude_hemisphere: String = parse_captures(&captures, LATITUDE_HEMISPHERE)?;
    let longitude_degrees: f64 = parse_captures(&captures, LONGITUDE_DEGREES)?;
    let longitude_minutes: f64 = parse_captures(&captures, LONGITUDE_MINUTES)?;
    let longitude_hemisphere: String = parse_captures(&captures, LONGITUDE_HEMISPHERE)?;
    let ground_track: f64 = parse_optional_capture(&captures, GROUND_TRACK)?.unwrap_or(0.0);
    let ground_speed_knots: f64 = parse_optional_capture(&captures, GROUND_SPEED)?.unwrap_or(0.0);
    let altitude_feet: f64 = parse_captures(&captures, GPS_ALTITUDE)?;

    let comment = &body[captures.get(0).map_or(0, |m| m.end())..];

    let (latitude_enhancement, longitude_enhancement) =
        match PRECISION_ENHANCEMENT_REGEX.captures(comment) {
            Some(enhancement) => (
                parse_captures::<f64>(&enhancement, LATITUDE_ENHANCEMENT)? / 1000.0,
                parse_captures::<f64>(&enhancement, LONGITUDE_ENHANCEMENT)? / 1000.0,
            ),
            None => (0.0, 0.0),
        };

    let beacon_id: OGNBeaconID = OGN_BEACON_ID_REGEX
        .captures(comment)
        .ok_or(BeaconBuildError::MissingBeaconID)
        .and_then(|id| parse_captures::<String>(&id, OGN_BEACON_ID))?
        .parse::<OGNBeaconID>()
        .map_err(|e| BeaconBuildError::InvalidBeaconID(e.to_string()))?;

    let climb_rate_fpm = capture_in(&CLIMB_RATE_REGEX, comment, CLIMB_RATE)?.unwrap_or(0.0);
    let turn_rate_rot = capture_in(&TURN_RATE_REGEX, comment, TURN_RATE)?.unwrap_or(0.0);
    let error_count = capture_in(&ERROR_COUNT_REGEX, comment, ERROR_COUNT)?.unwrap_or(0);

    Ok(Beacon {
        callsign: callsign.to_string(),
        address: beacon_id.icao_address,
        address_type: beacon_id.prefix.address_type,
        aircraft_type: beacon_id.prefix.aircraft_type,
        time: convert_to_current_datetime(&time)?,
        latitude: signed(
            convert_latlon_minutes_to_decimals(
                latitude_degrees,
                latitude_minutes + latitude_enhancement,
            ),
            latitude_hemisphere == "S",
        ),
        longitude: signed(
            convert_latlon_minutes_to_decimals(
                longitude_degrees,
                longitude_minutes + longitude_enhancement,
            ),
            longitude_hemisphere == "W",
        ),
        altitude: feet_to_meters(altitude_feet),
        climb_rate: climb_rate_fpm * FEET_PER_MINUTE_TO_MS,
        ground_speed: ground_speed_knots * KNOTS_TO_KMH,
        track: ground_track,
        turn_rate: turn_rate_rot * ROT_TO_DEGREES_PER_SECOND,
        error_count,
    })
}

pub fn parse_captures<T>(
    captures: &regex::Captures,
    string_name: &str,
) -> Result<T, BeaconBuildError>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    parse_optional_capture(captures, string_name)?
        .ok_or_else(|| BeaconBuildError::MissingCapture(string_name.to_string()))
}

fn parse_optional_capture<T>(
    captures: &regex::Captures,
    string_name: &str,
) -> Result<Option<T>, BeaconBuildError>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    captures
        .name(string_name)
        .map(|capture| {
            capture.as_str().parse::<T>().map_err(|e| {
                BeaconBuildError::InvalidFormat(format!("{string_name} component has error: {e}."))
            })
        })
        .transpose()
}

fn capture_in<T>(
    regex: &regex::Regex,
    comment: &str,
    string_name: &str,
) -> Result<Option<T>, BeaconBuildError>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    match regex.captures(comment) {
        Some(captures) => parse_optional_capture(&captures, string_name),
        None => Ok(None),
    }
}

fn convert_latlon_minutes_to_decimals(degrees: f64, minutes: f64) -> f64 {
    degrees + minutes / 60.0
}

fn signed(value: f64, negative: bool) -> f64 {
    if negative {
        -value
    } else {
        value
    }
}

#[allow(clippy::cast_possible_truncation)]
fn feet_to_meters(feet: f64) -> i32 {
    (feet * FEET_TO_METERS) as i32
}

fn convert_to_current_datetime(
    string: &str,
) -> Result<chrono::DateTime<chrono::Utc>, BeaconBuildError> {
    let today_utc = chrono::Utc::now().date_naive();
    let naive_time = chrono::NaiveTime::parse_from_str(string, "%H%M%S")
        .map_err(|e| BeaconBuildError::InvalidTimeFormat(e.to_string()))?;
    Ok(today_utc.and_time(naive_time).and_utc())
}
