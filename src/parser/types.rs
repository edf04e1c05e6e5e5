use crate::types::{
    ICAOAddress, ICAOAddressError, OGNAddressType, OGNAddressTypeError, OGNAircraftType,
    OGNAircraftTypeError,
};

/// The `idXXYYYYYY` token of an OGN aircraft beacon.
#[derive(Debug, PartialEq)]
pub struct OGNBeaconID {
    pub prefix: OGNIDPrefix,
    pub icao_address: ICAOAddress,
}

impl OGNBeaconID {
    #[must_use]
    pub fn new(prefix: OGNIDPrefix, icao_address: ICAOAddress) -> Self {
        OGNBeaconID {
            prefix,
            icao_address,
        }
    }
}
impl std::str::FromStr for OGNBeaconID {
    type Err = OGNBeaconIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 8 && s.is_ascii() {
            let prefix_hex = &s[..2]; // "XX"
            let address_hex = &s[2..]; // "YYYYYY"

            let prefix = OGNIDPrefix::from_hex_str(prefix_hex)
                .map_err(OGNBeaconIDError::OGNIDPrefixError)?;
            let icao_address = ICAOAddress::from_hex_str(address_hex)
                .map_err(OGNBeaconIDError::ICAOAddressError)?;

            Ok(OGNBeaconID::new(prefix, icao_address))
        } else {
            Err(OGNBeaconIDError::InvalidOGNBeaconFormat(s.to_string()))
        }
    }
}
#[derive(Debug)]
pub enum OGNBeaconIDError {
    OGNIDPrefixError(OGNIDPrefixError),
    ICAOAddressError(ICAOAddressError),
    InvalidOGNBeaconFormat(String),
}
impl std::fmt::Display for OGNBeaconIDError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OGNBeaconIDError::OGNIDPrefixError(e) => write!(f, "{e}"),
            OGNBeaconIDError::ICAOAddressError(e) => write!(f, "{e}"),
            OGNBeaconIDError::InvalidOGNBeaconFormat(string) => {
                write!(f, "Invalid beacon id format: {string}")
            }
        }
    }
}

/// First byte of the beacon id: `STttttaa` (stealth, no-track, aircraft
/// type, address type).
///
/// `no_track` and `stealth_mode` are decoded for completeness only; the FR24
/// record has no field for them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OGNIDPrefix {
    pub aircraft_type: OGNAircraftType,
    pub address_type: OGNAddressType,
    pub no_track: bool,
    pub stealth_mode: bool,
}

impl OGNIDPrefix {
    pub fn new(value: u8) -> Result<Self, OGNIDPrefixError> {
        let raw_type = (value >> 2) & 0b1111;
        let aircraft_type =
            OGNAircraftType::from_u8(raw_type).map_err(OGNIDPrefixError::InvalidAircraftType)?;

        let raw_address = value & 0b11;
        let address_type =
            OGNAddressType::from_u8(raw_address).map_err(OGNIDPrefixError::InvalidAddressType)?;

        let no_track = ((value >> 6) & 0b1) == 1;
        let stealth_mode = ((value >> 7) & 0b1) == 1;
        Ok(OGNIDPrefix {
            aircraft_type,
            address_type,
            no_track,
            stealth_mode,
        })
    }

    pub fn from_hex_str(s: &str) -> Result<Self, OGNIDPrefixError> {
        if s.len() != 2 {
            return Err(OGNIDPrefixError::InvalidHexFormat);
        }
        let parsed_value =
            u8::from_str_radix(s, 16).map_err(|_| OGNIDPrefixError::InvalidHexFormat)?;

        OGNIDPrefix::new(parsed_value)
    }
}
#[derive(Debug)]
pub enum OGNIDPrefixError {
    InvalidHexFormat,
    InvalidAircraftType(OGNAircraftTypeError),
    InvalidAddressType(OGNAddressTypeError),
}
impl std::fmt::Display for OGNIDPrefixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OGNIDPrefixError::InvalidHexFormat => write!(f, "Invalid hexadecimal format"),
            OGNIDPrefixError::InvalidAircraftType(e) => write!(f, "{e}"),
            OGNIDPrefixError::InvalidAddressType(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OGNBeaconID, OGNIDPrefix};
    use crate::types::{OGNAddressType, OGNAircraftType};

    #[test]
    fn when_parsing_flarm_tow_plane_id_then_prefix_fields_are_decoded() {
        let id: OGNBeaconID = "0ADDA5BA".parse().expect("valid id");
        assert_eq!(id.icao_address.value(), 0xDD_A5BA);
        assert_eq!(id.prefix.address_type, OGNAddressType::FLARM);
        assert_eq!(id.prefix.aircraft_type, OGNAircraftType::TowPlane);
        assert!(!id.prefix.no_track);
        assert!(!id.prefix.stealth_mode);
    }

    #[test]
    fn when_top_bits_set_then_stealth_and_no_track_are_flagged() {
        let prefix = OGNIDPrefix::new(0b1100_0101).expect("valid prefix");
        assert!(prefix.stealth_mode);
        assert!(prefix.no_track);
        assert_eq!(prefix.aircraft_type, OGNAircraftType::Glider);
        assert_eq!(prefix.address_type, OGNAddressType::ICAO);
    }

    #[test]
    fn when_id_has_wrong_length_then_error_is_returned() {
        assert!("0ADDA5".parse::<OGNBeaconID>().is_err());
        assert!("ZZDDA5BA".parse::<OGNBeaconID>().is_err());
    }
}
