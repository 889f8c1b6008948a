use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Manifest serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Schema mismatch: field '{field}' has no column in schema '{version}'")]
    SchemaMismatch { version: String, field: String },

    #[error("Icon asset for style '{style}' not found at {}", path.display())]
    AssetMissing { style: String, path: PathBuf },

    #[error("Failed to write archive {}: {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("KML serialization error: {0}")]
    Xml(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<ProcessingError>,
    },
}

/// Pipeline stage names used to tag fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Read,
    Schema,
    Build,
    Assemble,
    Package,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Read => "Read",
            PipelineStage::Schema => "Schema",
            PipelineStage::Build => "Record build",
            PipelineStage::Assemble => "Document assembly",
            PipelineStage::Package => "Packaging",
        };
        write!(f, "{}", name)
    }
}

impl ProcessingError {
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            already @ ProcessingError::Stage { .. } => already,
            other => ProcessingError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error once stage tags are stripped
    pub fn root(&self) -> &ProcessingError {
        match self {
            ProcessingError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach a pipeline stage to the error side of a result
pub trait StageContext<T> {
    fn stage(self, stage: PipelineStage) -> Result<T>;
}

impl<T> StageContext<T> for Result<T> {
    fn stage(self, stage: PipelineStage) -> Result<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}
