pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{
    dms_to_decimal, format_dms, latitude_from_dms, longitude_from_dms,
    validate_mexico_coordinates, Dms, Hemisphere, Rejection,
};
pub use filename::{generate_default_package_filename, slugify};
pub use progress::ProgressReporter;
