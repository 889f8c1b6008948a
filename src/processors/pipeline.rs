use crate::error::{PipelineStage, ProcessingError, Result, StageContext};
use crate::models::{
    CanonicalRecord, ColumnSchema, Document, Layer, Placemark, SchemaSelection,
};
use crate::processors::classifier::{layer_styles, resolve_style};
use crate::processors::record_builder::{BuildOutcome, RecordBuilder};
use crate::processors::run_report::RunReport;
use crate::readers::{Cell, SheetSource};
use crate::utils::constants::{DEFAULT_IDENTIFIER_PREFIX, HEADER_ROWS};
use crate::utils::progress::ProgressReporter;
use crate::writers::render_description;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Documents produced by one run, in layer order, with the run tallies
#[derive(Debug)]
pub struct PipelineOutput {
    pub documents: Vec<(Layer, Document)>,
    pub report: RunReport,
}

impl PipelineOutput {
    pub fn document(&self, layer: Layer) -> Option<&Document> {
        self.documents
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, doc)| doc)
    }
}

/// Sheet rows in, one document per layer out
pub struct Pipeline {
    max_workers: usize,
    identifier_prefix: String,
    schema: SchemaSelection,
    layers: BTreeSet<Layer>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            max_workers: num_cpus::get(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            schema: SchemaSelection::Auto,
            layers: Layer::ALL.into_iter().collect(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = prefix.into();
        self
    }

    pub fn with_schema(mut self, schema: SchemaSelection) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_layers(mut self, layers: impl IntoIterator<Item = Layer>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    pub fn identifier_prefix(&self) -> &str {
        &self.identifier_prefix
    }

    /// Run every stage up to document assembly
    pub fn run(
        &self,
        source: &dyn SheetSource,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        let schema = self.select_schema(source)?;
        info!(
            "Using schema '{}' ({} mapped columns)",
            schema.version(),
            schema.columns().len()
        );

        let mut report = RunReport::new(schema.version());
        let outcomes = self
            .build_records(source, &schema, &mut report, progress)
            .stage(PipelineStage::Build)?;
        info!(
            "Built {} records, rejected {} rows",
            report.accepted_rows,
            report.rejected_rows()
        );

        let documents = self.assemble(&outcomes, &mut report);
        Ok(PipelineOutput { documents, report })
    }

    /// Resolve the column layout once per run and check required fields
    pub fn select_schema(&self, source: &dyn SheetSource) -> Result<ColumnSchema> {
        let header_width = source.header_width(HEADER_ROWS);
        debug!("Header width: {} columns", header_width);

        let schema = self.schema.resolve(header_width);
        schema.validate().stage(PipelineStage::Schema)?;
        Ok(schema)
    }

    /// Build every data row on a bounded pool; outcomes keep source-row order
    pub fn build_records(
        &self,
        source: &dyn SheetSource,
        schema: &ColumnSchema,
        report: &mut RunReport,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<BuildOutcome>> {
        let mut rows: Vec<(usize, &[Cell])> = Vec::new();
        for index in (HEADER_ROWS + 1)..=source.row_count() {
            match source.row(index) {
                Some(cells) if !cells.iter().all(Cell::is_blank) => rows.push((index, cells)),
                _ => {
                    debug!("Row {} is blank, skipping", index);
                    report.record_blank();
                }
            }
        }

        if let Some(p) = progress {
            p.set_message(&format!("Building {} records...", rows.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let builder = RecordBuilder::new(schema, self.identifier_prefix.as_str());
        let outcomes: Vec<BuildOutcome> = pool.install(|| {
            rows.par_iter()
                .map(|(index, cells)| {
                    let outcome = builder.build(*index, cells);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    outcome
                })
                .collect()
        });

        for outcome in &outcomes {
            if let BuildOutcome::Accepted { record, misses } = outcome {
                for miss in misses {
                    debug!(
                        "Row {}: no {:?} entry for '{}'",
                        record.row, miss.table, miss.value
                    );
                }
            }
            report.record_outcome(outcome);
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Built {} records", report.accepted_rows));
        }

        Ok(outcomes)
    }

    /// One document per selected layer, placemarks in source-row order.
    ///
    /// Each document declares every style its layer can produce, used or not,
    /// so packaging checks the full icon set on every run.
    pub fn assemble(
        &self,
        outcomes: &[BuildOutcome],
        report: &mut RunReport,
    ) -> Vec<(Layer, Document)> {
        let mut documents = Vec::with_capacity(self.layers.len());

        for &layer in &self.layers {
            let mut document = Document::new(layer.document_name());
            for style in layer_styles(layer) {
                document.add_style(style);
            }
            for record in outcomes
                .iter()
                .filter_map(BuildOutcome::record)
                .filter(|r| r.belongs_to(layer))
            {
                document.add_placemark(self.placemark(record, layer));
            }

            if document.is_empty() {
                warn!("Layer '{}' has no placemarks", layer);
            } else {
                info!(
                    "Assembled '{}': {} placemarks, {} styles",
                    document.name(),
                    document.placemarks().len(),
                    document.style_count()
                );
            }

            report.record_layer(layer, document.placemarks().len());
            documents.push((layer, document));
        }

        documents
    }

    fn placemark(&self, record: &CanonicalRecord, layer: Layer) -> Placemark {
        Placemark {
            name: record.display_name(&self.identifier_prefix).to_string(),
            style: resolve_style(&record.aerodrome_type, &record.status, layer),
            description: render_description(record),
            longitude: record.longitude,
            latitude: record.latitude,
            altitude: record.elevation_m,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
