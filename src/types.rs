/// One aircraft position report as received from the OGN network.
#[derive(Debug, PartialEq, Clone)]
pub struct Beacon {
    pub callsign: String,
    pub address: ICAOAddress,
    pub address_type: OGNAddressType,
    pub aircraft_type: OGNAircraftType,
    /// Time the beacon was reported. Never put on the wire.
    pub time: chrono::DateTime<chrono::Utc>,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Meters.
    pub altitude: i32,
    /// m/s
    pub climb_rate: f64,
    /// km/h
    pub ground_speed: f64,
    /// Degrees, 0 - 360.
    pub track: f64,
    /// Degrees per second.
    pub turn_rate: f64,
    pub error_count: u32,
}

/// Descriptive metadata about an aircraft, identified by its registration.
#[derive(Debug, PartialEq, Eq, Clone, serde::Deserialize)]
pub struct Descriptor {
    pub registration: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub competition_number: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub home_base: String,
    #[serde(default = "default_true")]
    pub tracked: bool,
    #[serde(default = "default_true")]
    pub identified: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub struct ICAOAddress(u32);

impl ICAOAddress {
    pub const MAX_VALUE: u32 = 0x00FF_FFFF;

    pub fn new(value: u32) -> Result<Self, ICAOAddressError> {
        if value <= Self::MAX_VALUE {
            Ok(ICAOAddress(value))
        } else {
            Err(ICAOAddressError::InvalidAddress(value))
        }
    }

    pub fn from_hex_str(s: &str) -> Result<Self, ICAOAddressError> {
        let value = u32::from_str_radix(s, 16).map_err(|_| ICAOAddressError::InvalidHexFormat)?;
        ICAOAddress::new(value)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ICAOAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

#[derive(Debug)]
pub enum ICAOAddressError {
    InvalidHexFormat,
    InvalidAddress(u32),
}
impl std::fmt::Display for ICAOAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ICAOAddressError::InvalidHexFormat => write!(f, "Invalid hexadecimal format"),
            ICAOAddressError::InvalidAddress(val) => {
                write!(
                    f,
                    "Value 0x{:X} ({}) exceeds 24-bit ICAO address limit (0x{:X})",
                    val,
                    val,
                    ICAOAddress::MAX_VALUE
                )
            }
        }
    }
}
impl std::error::Error for ICAOAddressError {}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OGNAddressType {
    Unknown = 0,
    ICAO = 1,
    FLARM = 2,
    OgnTracker = 3,
}
impl OGNAddressType {
    pub fn from_u8(value: u8) -> Result<Self, OGNAddressTypeError> {
        match value {
            0 => Ok(OGNAddressType::Unknown),
            1 => Ok(OGNAddressType::ICAO),
            2 => Ok(OGNAddressType::FLARM),
            3 => Ok(OGNAddressType::OgnTracker),
            other => Err(OGNAddressTypeError::InvalidAddressType(other)),
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum OGNAddressTypeError {
    InvalidAddressType(u8),
}
impl std::fmt::Display for OGNAddressTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OGNAddressTypeError::InvalidAddressType(address) => {
                write!(f, "Invalid address type {address}")
            }
        }
    }
}
impl std::error::Error for OGNAddressTypeError {}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OGNAircraftType {
    Reserved = 0,
    Glider = 1,
    TowPlane = 2,
    Helicopter = 3,
    Parachute = 4,
    DropPlane = 5,
    HangGlider = 6,
    Paraglider = 7,
    ReciprocatingEngineAircraft = 8,
    JetTurbopropAircraft = 9,
    Unknown = 10,
    Balloon = 11,
    Airship = 12,
    UAVs = 13,
    ReservedE = 14,
    StaticObstacle = 15,
}

impl OGNAircraftType {
    pub fn from_u8(value: u8) -> Result<Self, OGNAircraftTypeError> {
        match value {
            0 => Ok(OGNAircraftType::Reserved),
            1 => Ok(OGNAircraftType::Glider),
            2 => Ok(OGNAircraftType::TowPlane),
            3 => Ok(OGNAircraftType::Helicopter),
            4 => Ok(OGNAircraftType::Parachute),
            5 => Ok(OGNAircraftType::DropPlane),
            6 => Ok(OGNAircraftType::HangGlider),
            7 => Ok(OGNAircraftType::Paraglider),
            8 => Ok(OGNAircraftType::ReciprocatingEngineAircraft),
            9 => Ok(OGNAircraftType::JetTurbopropAircraft),
            10 => Ok(OGNAircraftType::Unknown),
            11 => Ok(OGNAircraftType::Balloon),
            12 => Ok(OGNAircraftType::Airship),
            13 => Ok(OGNAircraftType::UAVs),
            14 => Ok(OGNAircraftType::ReservedE),
            15 => Ok(OGNAircraftType::StaticObstacle),
            other => Err(OGNAircraftTypeError::InvalidEnum(other)),
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}
#[derive(Debug)]
pub enum OGNAircraftTypeError {
    InvalidEnum(u8),
}

impl std::fmt::Display for OGNAircraftTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OGNAircraftTypeError::InvalidEnum(value) => write!(f, "Invalid aircraft type: {value}"),
        }
    }
}
impl std::error::Error for OGNAircraftTypeError {}
