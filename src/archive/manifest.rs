use crate::error::Result;
use crate::utils::constants::MANIFEST_TIMESTAMP_FORMAT;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Package metadata written as `manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[validate(length(min = 1, message = "pack name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, max = 16))]
    pub abbreviation: String,

    #[validate(length(min = 1))]
    pub version: String,

    #[validate(length(min = 1))]
    pub organization_name: String,

    /// `YYYYMMDDTHHMMSS`
    #[validate(length(equal = 15))]
    pub effective_date: String,

    #[validate(length(equal = 15))]
    pub expiration_date: String,

    pub no_share: bool,
}

impl Manifest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        version: impl Into<String>,
        organization_name: impl Into<String>,
        effective: NaiveDateTime,
        validity_days: i64,
        no_share: bool,
    ) -> Self {
        let expiration = effective + Duration::days(validity_days);
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            version: version.into(),
            organization_name: organization_name.into(),
            effective_date: format_timestamp(effective),
            expiration_date: format_timestamp(expiration),
            no_share,
        }
    }

    /// Validated, pretty-printed JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(MANIFEST_TIMESTAMP_FORMAT).to_string()
}
