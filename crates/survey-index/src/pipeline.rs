//! Index construction over a whole dataset
//!
//! [`IndexPipeline`] applies, in order: ordinal label mapping, rescaling of
//! every configured score column, reverse coding of inverted items into
//! suffixed copies, composite index construction and tercile labelling.
//! Every step adds or replaces columns in the dataset it is given.

use crate::composite::CompositeBuilder;
use crate::reverse::ReverseCoder;
use crate::scale::{is_degenerate, needs_rescale, rescale};
use crate::tercile::tercile_labels;
use std::collections::{BTreeMap, BTreeSet};
use survey_core::{AnalysisConfig, Column, Dataset, Diagnostic, DiagnosticBus, Result};
use tracing::{debug, instrument};

/// What an [`IndexPipeline`] run changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformSummary {
    /// Categorical columns converted through an ordinal map
    pub mapped: Vec<String>,
    /// Columns rescaled onto 1-5
    pub rescaled: Vec<String>,
    /// Rescaled columns that collapsed to the midpoint
    pub constant: Vec<String>,
    /// Reverse-coded columns added
    pub reversed: Vec<String>,
    /// Composite index columns added
    pub composites: Vec<String>,
    /// Tercile label column, if one was added
    pub tercile_column: Option<String>,
    /// Configured columns that were absent
    pub skipped: Vec<String>,
}

/// Builds the derived columns of a study
#[derive(Debug, Clone)]
pub struct IndexPipeline<'a> {
    config: &'a AnalysisConfig,
    bus: DiagnosticBus,
}

impl<'a> IndexPipeline<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            config,
            bus: DiagnosticBus::new(),
        }
    }

    /// Report non-fatal problems on `bus`
    pub fn with_diagnostics(mut self, bus: DiagnosticBus) -> Self {
        self.bus = bus;
        self
    }

    /// Run every step against `dataset`
    ///
    /// Absent configured columns are reported and skipped, except composite
    /// constituents: a missing constituent fails the run with
    /// [`survey_core::Error::MissingRequiredColumn`].
    #[instrument(skip(self, dataset), fields(records = dataset.n_records(), columns = dataset.n_columns()))]
    pub fn apply(&self, dataset: &mut Dataset) -> Result<TransformSummary> {
        let mut summary = TransformSummary::default();

        self.map_ordinals(dataset, &mut summary)?;
        self.rescale_scores(dataset, &mut summary)?;
        self.reverse_inverted(dataset, &mut summary)?;
        self.build_composites(dataset, &mut summary)?;
        self.label_terciles(dataset, &mut summary)?;

        debug!(
            rescaled = summary.rescaled.len(),
            reversed = summary.reversed.len(),
            composites = summary.composites.len(),
            "index construction finished"
        );
        Ok(summary)
    }

    fn missing(&self, stage: &'static str, column: &str, summary: &mut TransformSummary) {
        self.bus.emit(Diagnostic::ConfigurationMismatch {
            stage,
            column: column.to_string(),
        });
        summary.skipped.push(column.to_string());
    }

    fn map_ordinals(&self, dataset: &mut Dataset, summary: &mut TransformSummary) -> Result<()> {
        for (column, map) in &self.config.ordinal_maps {
            if !dataset.has_column(column) {
                self.missing("ordinal_map", column, summary);
                continue;
            }
            let Column::Categorical(labels) = dataset.column(column)? else {
                self.bus.emit(Diagnostic::ComputationFailure {
                    stage: "ordinal_map",
                    detail: format!("column '{column}' is already numeric"),
                });
                continue;
            };

            let (mapped, unmapped) = map_labels(labels, map);
            for label in unmapped {
                self.bus.emit(Diagnostic::UnmappedLabel {
                    column: column.clone(),
                    label,
                });
            }

            let is_score = self.config.score_columns.iter().any(|s| &s.name == column);
            let mapped = if !is_score && needs_rescale(&mapped) {
                rescale(&mapped)
            } else {
                mapped
            };
            dataset.insert_column(column.clone(), Column::Numeric(mapped))?;
            summary.mapped.push(column.clone());
        }
        Ok(())
    }

    fn rescale_scores(&self, dataset: &mut Dataset, summary: &mut TransformSummary) -> Result<()> {
        for score in &self.config.score_columns {
            if !dataset.has_column(&score.name) {
                self.missing("rescale", &score.name, summary);
                continue;
            }
            let values = match dataset.numeric(&score.name) {
                Ok(values) => values,
                Err(e) => {
                    self.bus.emit(Diagnostic::ComputationFailure {
                        stage: "rescale",
                        detail: e.to_string(),
                    });
                    continue;
                }
            };

            if is_degenerate(values) {
                self.bus.emit(Diagnostic::ConstantColumn {
                    column: score.name.clone(),
                });
                summary.constant.push(score.name.clone());
            }
            let scaled = rescale(values);
            dataset.insert_column(score.name.clone(), Column::Numeric(scaled))?;
            summary.rescaled.push(score.name.clone());
        }
        Ok(())
    }

    fn reverse_inverted(&self, dataset: &mut Dataset, summary: &mut TransformSummary) -> Result<()> {
        let coder = ReverseCoder::new(self.config.range_policy).with_diagnostics(self.bus.clone());
        for column in self.config.inverted_columns() {
            if !dataset.has_column(column) {
                self.missing("reverse", column, summary);
                continue;
            }
            let values = match dataset.numeric(column) {
                Ok(values) => values,
                Err(e) => {
                    self.bus.emit(Diagnostic::ComputationFailure {
                        stage: "reverse",
                        detail: e.to_string(),
                    });
                    continue;
                }
            };
            let reversed = coder.reverse_column(column, values)?;
            let name = self.config.reversed_name(column);
            dataset.insert_column(name.clone(), Column::Numeric(reversed))?;
            summary.reversed.push(name);
        }
        Ok(())
    }

    fn build_composites(&self, dataset: &mut Dataset, summary: &mut TransformSummary) -> Result<()> {
        let builder = CompositeBuilder::new();
        for spec in &self.config.composites {
            let values = builder.build(dataset, spec)?;
            dataset.insert_column(spec.name.clone(), Column::Numeric(values))?;
            summary.composites.push(spec.name.clone());
        }
        Ok(())
    }

    fn label_terciles(&self, dataset: &mut Dataset, summary: &mut TransformSummary) -> Result<()> {
        let Some(spec) = &self.config.tercile else {
            return Ok(());
        };
        if !dataset.has_column(&spec.source) {
            self.missing("tercile", &spec.source, summary);
            return Ok(());
        }

        let source = dataset.numeric(&spec.source)?;
        match tercile_labels(source) {
            Ok(labels) => {
                let labels = labels
                    .into_iter()
                    .map(|t| t.map(|t| t.as_str().to_string()))
                    .collect();
                dataset.insert_column(spec.label_column.clone(), Column::Categorical(labels))?;
                summary.tercile_column = Some(spec.label_column.clone());
            }
            Err(e) => self.bus.emit(Diagnostic::ComputationFailure {
                stage: "tercile",
                detail: e.to_string(),
            }),
        }
        Ok(())
    }
}

/// Map text labels to numbers; returns the values and the distinct unmapped labels
fn map_labels(
    labels: &[Option<String>],
    map: &BTreeMap<String, f64>,
) -> (Vec<Option<f64>>, BTreeSet<String>) {
    let mut unmapped = BTreeSet::new();
    let values = labels
        .iter()
        .map(|label| {
            let label = label.as_deref()?.trim();
            let value = map.get(label).copied();
            if value.is_none() {
                unmapped.insert(label.to_string());
            }
            value
        })
        .collect();
    (values, unmapped)
}
