use crate::models::{Layer, SchemaVersion, TableKind};
use crate::processors::record_builder::BuildOutcome;
use crate::utils::Rejection;
use std::collections::BTreeMap;

/// Non-fatal conditions collected over one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub schema_version: SchemaVersion,
    pub total_rows: usize,
    pub blank_rows: usize,
    pub accepted_rows: usize,
    pub rejected: Vec<(usize, Rejection)>,
    pub normalization_misses: BTreeMap<TableKind, BTreeMap<String, usize>>,
    pub layer_counts: BTreeMap<Layer, usize>,
}

impl RunReport {
    pub fn new(schema_version: SchemaVersion) -> Self {
        Self {
            schema_version,
            total_rows: 0,
            blank_rows: 0,
            accepted_rows: 0,
            rejected: Vec::new(),
            normalization_misses: BTreeMap::new(),
            layer_counts: BTreeMap::new(),
        }
    }

    pub fn record_blank(&mut self) {
        self.total_rows += 1;
        self.blank_rows += 1;
    }

    pub fn record_outcome(&mut self, outcome: &BuildOutcome) {
        self.total_rows += 1;
        match outcome {
            BuildOutcome::Accepted { misses, .. } => {
                self.accepted_rows += 1;
                for miss in misses {
                    *self
                        .normalization_misses
                        .entry(miss.table)
                        .or_default()
                        .entry(miss.value.clone())
                        .or_default() += 1;
                }
            }
            BuildOutcome::Rejected { row, reason } => {
                self.rejected.push((*row, *reason));
            }
        }
    }

    pub fn record_layer(&mut self, layer: Layer, placemarks: usize) {
        self.layer_counts.insert(layer, placemarks);
    }

    pub fn rejected_rows(&self) -> usize {
        self.rejected.len()
    }

    /// Rejection counts keyed by reason
    pub fn rejections_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in &self.rejected {
            *counts.entry(reason.label()).or_default() += 1;
        }
        counts
    }

    /// Total occurrences of values with no table entry
    pub fn total_misses(&self) -> usize {
        self.normalization_misses
            .values()
            .flat_map(|values| values.values())
            .sum()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Conversion Report ===\n");
        summary.push_str(&format!("Schema: {}\n", self.schema_version));
        summary.push_str(&format!("Data Rows: {}\n", self.total_rows));
        if self.blank_rows > 0 {
            summary.push_str(&format!("Blank Rows Skipped: {}\n", self.blank_rows));
        }
        summary.push_str(&format!("Accepted: {}\n", self.accepted_rows));
        summary.push_str(&format!("Rejected: {}\n", self.rejected_rows()));
        for (reason, count) in self.rejections_by_reason() {
            summary.push_str(&format!("  {}: {}\n", reason, count));
        }

        if !self.layer_counts.is_empty() {
            summary.push_str("\nPlacemarks per layer:\n");
            for (layer, count) in &self.layer_counts {
                summary.push_str(&format!("  {}: {}\n", layer, count));
            }
        }

        summary.push_str(&format!(
            "\nUn-normalised values: {}\n",
            self.total_misses()
        ));
        for (table, values) in &self.normalization_misses {
            let distinct: Vec<String> = values
                .iter()
                .take(5)
                .map(|(value, count)| format!("'{}' x{}", value, count))
                .collect();
            let more = values.len().saturating_sub(5);
            summary.push_str(&format!("  {:?}: {}", table, distinct.join(", ")));
            if more > 0 {
                summary.push_str(&format!(" (+{} more)", more));
            }
            summary.push('\n');
        }

        summary
    }
}
