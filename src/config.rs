use crate::archive::Manifest;
use crate::error::{ProcessingError, Result};
use crate::models::{Field, Layer, SchemaSelection, SchemaVersion};
use crate::utils::constants::*;
use crate::writers::DescriptionFormat;
use chrono::{NaiveDate, NaiveTime};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Everything a run needs besides its input and output paths.
///
/// Sources are layered: built-in defaults, an optional TOML file, then
/// `MXPACK_*` environment variables (`MXPACK_PACKAGE__NAME` for nested keys).
/// Command-line flags are applied on top by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// `auto`, `legacy`, `classified`, `runway` or `custom`
    #[validate(length(min = 1))]
    pub schema: String,

    /// 0-based column per field, read when `schema = "custom"`
    pub columns: BTreeMap<Field, usize>,

    #[validate(length(max = 8))]
    pub identifier_prefix: String,

    #[validate(length(min = 1, message = "at least one layer must be selected"))]
    pub layers: Vec<Layer>,

    pub description_format: DescriptionFormat,

    #[validate(range(min = 1, max = 256))]
    pub max_workers: usize,

    #[validate(nested)]
    pub package: PackageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PackageConfig {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1, max = 16))]
    pub abbreviation: String,

    #[validate(length(min = 1))]
    pub organization: String,

    #[validate(length(min = 1))]
    pub version: String,

    #[validate(range(min = 1, max = 3650))]
    pub validity_days: i64,

    pub no_share: bool,

    /// Defaults to the build date
    pub effective_date: Option<NaiveDate>,

    pub icons_dir: PathBuf,

    /// Directory mirrored into the pack root alongside `navdata/`
    pub extra_content: Option<PathBuf>,

    pub keep_staging: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema: "auto".to_string(),
            columns: BTreeMap::new(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            layers: Layer::ALL.to_vec(),
            description_format: DescriptionFormat::Html,
            max_workers: num_cpus::get().clamp(1, 256),
            package: PackageConfig::default(),
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACK_NAME.to_string(),
            abbreviation: DEFAULT_PACK_ABBREVIATION.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            version: DEFAULT_PACK_VERSION.to_string(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            no_share: false,
            effective_date: None,
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            extra_content: None,
            keep_staging: false,
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("layers"),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Interpret `schema` and `columns`
    pub fn schema_selection(&self) -> Result<SchemaSelection> {
        match self.schema.trim().to_lowercase().as_str() {
            "auto" => Ok(SchemaSelection::Auto),
            "custom" => {
                if self.columns.is_empty() {
                    return Err(ProcessingError::Config(
                        "schema 'custom' requires a [columns] table".to_string(),
                    ));
                }
                Ok(SchemaSelection::Custom(self.columns.clone()))
            }
            other => match SchemaVersion::parse(other) {
                Some(version) => Ok(SchemaSelection::Fixed(version)),
                None => Err(ProcessingError::Config(format!(
                    "Unknown schema version: {}",
                    self.schema
                ))),
            },
        }
    }
}

impl PackageConfig {
    /// Manifest effective from midnight of the configured date, or `today`
    pub fn manifest(&self, today: NaiveDate) -> Manifest {
        let effective = self.effective_date.unwrap_or(today).and_time(NaiveTime::MIN);
        Manifest::new(
            self.name.as_str(),
            self.abbreviation.as_str(),
            self.version.as_str(),
            self.organization.as_str(),
            effective,
            self.validity_days,
            self.no_share,
        )
    }
}
