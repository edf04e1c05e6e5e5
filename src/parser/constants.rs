pub const CALLSIGN_DELIMITER: &str = ">";
pub const HEADER_BODY_DELIMITER: char = ':';

pub const TIME: &str = "time";
pub const LATITUDE_DEGREES: &str = "latitude_degrees";
pub const LATITUDE_MINUTES: &str = "latitude_minutes";
pub const LATITUDE_HEMISPHERE: &str = "latitude_hemisphere";
pub const LONGITUDE_DEGREES: &str = "longitude_degrees";
pub const LONGITUDE_MINUTES: &str = "longitude_minutes";
pub const LONGITUDE_HEMISPHERE: &str = "longitude_hemisphere";
pub const GROUND_TRACK: &str = "ground_track";
pub const GROUND_SPEED: &str = "ground_speed";
pub const GPS_ALTITUDE: &str = "gps_altitude";
pub const LATITUDE_ENHANCEMENT: &str = "latitude_enhancement";
pub const LONGITUDE_ENHANCEMENT: &str = "longitude_enhancement";
pub const OGN_BEACON_ID: &str = "ogn_beacon_id";
pub const CLIMB_RATE: &str = "climb_rate";
pub const TURN_RATE: &str = "turn_rate";
pub const ERROR_COUNT: &str = "error_count";

pub const KNOTS_TO_KMH: f64 = 1.852;
pub const FEET_TO_METERS: f64 = 0.3048;
pub const FEET_PER_MINUTE_TO_MS: f64 = FEET_TO_METERS / 60.0;
/// One "rot" is a half turn per minute.
pub const ROT_TO_DEGREES_PER_SECOND: f64 = 3.0;

pub static GPS_DATA_REGEX: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    let regex_string = format!(
        r"^[/@](?P<{TIME}>\d{{6}})h(?P<{LATITUDE_DEGREES}>\d{{2}})(?P<{LATITUDE_MINUTES}>\d{{2}}\.\d{{2}})(?P<{LATITUDE_HEMISPHERE}>[NS]).(?P<{LONGITUDE_DEGREES}>\d{{3}})(?P<{LONGITUDE_MINUTES}>\d{{2}}\.\d{{2}})(?P<{LONGITUDE_HEMISPHERE}>[EW]).(?:(?P<{GROUND_TRACK}>\d{{3}})/(?P<{GROUND_SPEED}>\d{{3}}))?/A=(?P<{GPS_ALTITUDE}>-?\d{{5,6}})",
    );
    regex::Regex::new(&regex_string).unwrap()
});
pub static PRECISION_ENHANCEMENT_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        let regex_string = format!(
            r"!W(?P<{LATITUDE_ENHANCEMENT}>\d)(?P<{LONGITUDE_ENHANCEMENT}>\d)!"
        );
        regex::Regex::new(&regex_string).unwrap()
    });
pub static OGN_BEACON_ID_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        let regex_string = format!(r"\bid(?P<{OGN_BEACON_ID}>[0-9A-Fa-f]{{8}})\b");
        regex::Regex::new(&regex_string).unwrap()
    });
pub static CLIMB_RATE_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        let regex_string = format!(r"(?:^|\s)(?P<{CLIMB_RATE}>[+-]?\d+)fpm\b");
        regex::Regex::new(&regex_string).unwrap()
    });
pub static TURN_RATE_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        let regex_string = format!(r"(?:^|\s)(?P<{TURN_RATE}>[+-]?\d+(?:\.\d+)?)rot\b");
        regex::Regex::new(&regex_string).unwrap()
    });
pub static ERROR_COUNT_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| {
        let regex_string = format!(r"(?:^|\s)(?P<{ERROR_COUNT}>\d+)e(?:\s|$)");
        regex::Regex::new(&regex_string).unwrap()
    });
