pub mod classifier;
pub mod normalizer;
pub mod pipeline;
pub mod record_builder;
pub mod run_report;

pub use classifier::{layer_membership, layer_styles, resolve_style};
pub use normalizer::{normalize, translate_duration, NormalizationTable};
pub use pipeline::{Pipeline, PipelineOutput};
pub use record_builder::{BuildOutcome, NormalizationMiss, RecordBuilder};
pub use run_report::RunReport;
