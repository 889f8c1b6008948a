/// Mexico geographic bounds
pub const MX_MIN_LAT: f64 = 14.0;
pub const MX_MAX_LAT: f64 = 33.0;
pub const MX_MIN_LON: f64 = -119.0;
pub const MX_MAX_LON: f64 = -86.0;

/// 1 m = 3.28084 ft
pub const FEET_PER_METER: f64 = 3.28084;

/// Rows 1 and 2 of the register are headers
pub const HEADER_ROWS: usize = 2;

/// Prefix prepended to every designator
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "X";

/// Archive layout
pub const DOCUMENT_ENTRY: &str = "doc.kml";
pub const ICON_DIR: &str = "files";
pub const NAVDATA_DIR: &str = "navdata";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const CONTAINER_EXTENSION: &str = "kmz";

/// KML namespace
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Manifest timestamp format (YYYYMMDDTHHMMSS)
pub const MANIFEST_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Package defaults
pub const DEFAULT_PACK_NAME: &str = "Mexican Aerodromes";
pub const DEFAULT_PACK_ABBREVIATION: &str = "MX-AD";
pub const DEFAULT_ORGANIZATION: &str = "Mexican Aerodromes Pack";
pub const DEFAULT_VALIDITY_DAYS: i64 = 365;
pub const DEFAULT_PACK_VERSION: &str = "1";
pub const DEFAULT_ICONS_DIR: &str = "icons";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MXPACK";
