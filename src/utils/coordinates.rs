use crate::utils::constants::{MX_MAX_LAT, MX_MAX_LON, MX_MIN_LAT, MX_MIN_LON};
use serde::{Deserialize, Serialize};

/// Raw sexagesimal triple as it appears in the register
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    West,
}

impl Hemisphere {
    fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::West => 'W',
        }
    }
}

/// Why a coordinate pair was excluded from the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    ZeroCoordinates,
    LatitudeOutOfBounds(f64),
    LongitudeOutOfBounds(f64),
}

impl Rejection {
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::ZeroCoordinates => "zero coordinates",
            Rejection::LatitudeOutOfBounds(_) => "latitude out of bounds",
            Rejection::LongitudeOutOfBounds(_) => "longitude out of bounds",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::ZeroCoordinates => write!(f, "latitude and longitude are both 0"),
            Rejection::LatitudeOutOfBounds(lat) => write!(
                f,
                "latitude {} is outside Mexico bounds [{}, {}]",
                lat, MX_MIN_LAT, MX_MAX_LAT
            ),
            Rejection::LongitudeOutOfBounds(lon) => write!(
                f,
                "longitude {} is outside Mexico bounds [{}, {}]",
                lon, MX_MIN_LON, MX_MAX_LON
            ),
        }
    }
}

/// Convert DMS (Degrees, Minutes, Seconds) components to decimal degrees
///
/// # Examples
/// ```
/// use mx_aero_pack::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal(19.0, 26.0, 10.0);
/// assert!((decimal - 19.436111).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

pub fn latitude_from_dms(dms: &Dms) -> f64 {
    dms_to_decimal(dms.degrees, dms.minutes, dms.seconds)
}

/// The register only covers the western hemisphere, so longitude is always
/// negative whatever sign the degree cell carries.
pub fn longitude_from_dms(dms: &Dms) -> f64 {
    -dms_to_decimal(dms.degrees.abs(), dms.minutes.abs(), dms.seconds.abs())
}

/// Validate Mexico coordinate bounds
pub fn validate_mexico_coordinates(latitude: f64, longitude: f64) -> Result<(), Rejection> {
    if latitude == 0.0 && longitude == 0.0 {
        return Err(Rejection::ZeroCoordinates);
    }

    if !(MX_MIN_LAT..=MX_MAX_LAT).contains(&latitude) {
        return Err(Rejection::LatitudeOutOfBounds(latitude));
    }

    if !(MX_MIN_LON..=MX_MAX_LON).contains(&longitude) {
        return Err(Rejection::LongitudeOutOfBounds(longitude));
    }

    Ok(())
}

/// Render a DMS triple for display, e.g. `19° 26' 10.50" N`.
///
/// Fractional degrees and minutes carry down into the next component.
pub fn format_dms(dms: &Dms, hemisphere: Hemisphere) -> String {
    let degrees = dms.degrees.abs();
    let minutes = dms.minutes.abs() + degrees.fract() * 60.0;
    let seconds = dms.seconds.abs() + minutes.fract() * 60.0;
    format!(
        "{}° {:02}' {:05.2}\" {}",
        degrees.trunc(),
        minutes.trunc(),
        seconds,
        hemisphere.letter()
    )
}
