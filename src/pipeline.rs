//! End-to-end study driver
//!
//! [`StudyPipeline`] builds the indices of a dataset, runs every configured
//! battery, follows up the strongest significant result with Tukey HSD and
//! adds the two-way and assumption analyses. All stages report to one
//! diagnostic bus; only configuration errors and missing composite
//! constituents abort a run.

use crate::error::Result;
use std::fmt;
use std::fs;
use std::path::Path;
use survey_anova::{
    AnovaEngine, AnovaResult, AssumptionChecker, BatterySummary, PostHocAnalyzer, ResultTable,
    TestStatistic, TukeyTable, TwoWayTable,
};
use survey_core::{AnalysisConfig, Dataset, Diagnostic, DiagnosticBus};
use survey_index::{IndexPipeline, TransformSummary};
use tracing::{info, instrument};

/// Composite dataset written by [`StudyPipeline::run_files`]
pub const COMPOSITE_FILE: &str = "composite_indices.csv";
pub const RESULTS_FILE: &str = "anova_results.csv";
pub const TUKEY_FILE: &str = "tukey_hsd.csv";
pub const TWO_WAY_FILE: &str = "two_way_anova.csv";

/// Results of one named battery
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReport {
    pub name: String,
    pub table: ResultTable,
}

/// Everything a study run produced
#[derive(Debug, Clone, PartialEq)]
pub struct StudyReport {
    pub alpha: f64,
    pub transform: TransformSummary,
    pub batteries: Vec<BatteryReport>,
    /// All battery results in run order
    pub combined: ResultTable,
    pub summary: BatterySummary,
    /// Tukey HSD of the most significant pairing, if any was significant
    pub tukey: Option<TukeyTable>,
    pub two_way: Option<TwoWayTable>,
    /// Normality of each configured column that could be tested
    pub normality: Vec<(String, TestStatistic)>,
    pub homogeneity: Option<TestStatistic>,
}

impl StudyReport {
    /// Up to `n` significant results across all batteries, smallest p first
    pub fn most_significant(&self, n: usize) -> Vec<&AnovaResult> {
        self.combined.most_significant(n)
    }
}

impl fmt::Display for StudyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total tests conducted: {}", self.summary.total_tests)?;
        writeln!(
            f,
            "Significant results (p < {}): {} ({:.1}%)",
            self.alpha, self.summary.significant_tests, self.summary.percent_significant
        )?;

        let top = self.most_significant(3);
        if !top.is_empty() {
            writeln!(f, "Most significant findings:")?;
            for r in top {
                writeln!(
                    f,
                    "  {} -> {}: F = {:.3}, p = {:.4}, effect size = {:.3}",
                    r.independent, r.dependent, r.f_statistic, r.p_value, r.effect_size
                )?;
            }
        }

        if let Some(tukey) = &self.tukey {
            writeln!(
                f,
                "Tukey HSD {} -> {}: {} of {} pairs differ",
                tukey.independent,
                tukey.dependent,
                tukey.rejected().count(),
                tukey.comparisons.len()
            )?;
        }

        if let Some(table) = &self.two_way {
            writeln!(
                f,
                "Two-way {} x {} on {} (n = {}):",
                table.factor_a, table.factor_b, table.dependent, table.n_observations
            )?;
            for row in &table.rows {
                match (row.f_statistic, row.p_value) {
                    (Some(stat), Some(p)) => writeln!(
                        f,
                        "  {:<24} SS = {:.3}, df = {}, F = {:.3}, p = {:.4}",
                        row.source, row.sum_sq, row.df, stat, p
                    )?,
                    _ => writeln!(f, "  {:<24} SS = {:.3}, df = {}", row.source, row.sum_sq, row.df)?,
                }
            }
        }

        for (column, test) in &self.normality {
            writeln!(
                f,
                "{} {}: W = {:.4}, p = {:.4}",
                test.test, column, test.statistic, test.p_value
            )?;
        }
        if let Some(test) = &self.homogeneity {
            writeln!(f, "{}: W = {:.4}, p = {:.4}", test.test, test.statistic, test.p_value)?;
        }
        Ok(())
    }
}

/// Runs a configured study end to end
#[derive(Debug, Clone)]
pub struct StudyPipeline {
    config: AnalysisConfig,
    bus: DiagnosticBus,
}

impl StudyPipeline {
    /// Validate `config` and build a pipeline reporting to no one
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bus: DiagnosticBus::new(),
        })
    }

    /// Report diagnostics of every stage on `bus`
    pub fn with_diagnostics(mut self, bus: DiagnosticBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &DiagnosticBus {
        &self.bus
    }

    /// Add the rescaled, reverse-coded, composite and tercile columns
    pub fn build_indices(&self, dataset: &mut Dataset) -> Result<TransformSummary> {
        let summary = IndexPipeline::new(&self.config)
            .with_diagnostics(self.bus.clone())
            .apply(dataset)?;
        Ok(summary)
    }

    /// Run the analyses on a dataset whose indices are already built
    #[instrument(skip_all, fields(batteries = self.config.batteries.len()))]
    pub fn analyze(&self, dataset: &Dataset, transform: TransformSummary) -> Result<StudyReport> {
        let alpha = self.config.alpha;
        let engine = AnovaEngine::new(alpha)?.with_diagnostics(self.bus.clone());

        let mut batteries = Vec::with_capacity(self.config.batteries.len());
        let mut combined = ResultTable::default();
        for plan in &self.config.batteries {
            let (independent, dependent) = self.config.resolve_battery(plan)?;
            info!(battery = %plan.name, pairings = independent.len() * dependent.len(), "running battery");
            let table = engine.run_battery(dataset, &independent, &dependent);
            combined.extend(table.clone());
            batteries.push(BatteryReport {
                name: plan.name.clone(),
                table,
            });
        }
        let summary = combined.summary();

        let tukey = combined.posthoc_candidate().and_then(|candidate| {
            let analyzer = PostHocAnalyzer::new(alpha);
            self.recover(
                "posthoc",
                analyzer.tukey_hsd(dataset, &candidate.independent, &candidate.dependent),
            )
        });

        let two_way = self.config.two_way.as_ref().and_then(|spec| {
            let columns = [spec.factor_a.as_str(), spec.factor_b.as_str(), spec.dependent.as_str()];
            if self.report_absent(dataset, "two_way", &columns) {
                return None;
            }
            self.recover(
                "two_way",
                engine.two_way(dataset, &spec.factor_a, &spec.factor_b, &spec.dependent),
            )
        });

        let checker = AssumptionChecker::new();
        let normality = self
            .config
            .normality_columns
            .iter()
            .filter(|column| !self.report_absent(dataset, "normality", &[column.as_str()]))
            .filter_map(|column| {
                self.recover("normality", checker.column_normality(dataset, column))
                    .map(|test| (column.clone(), test))
            })
            .collect();

        let homogeneity = self.config.homogeneity.as_ref().and_then(|spec| {
            let columns = [spec.group_column.as_str(), spec.value_column.as_str()];
            if self.report_absent(dataset, "homogeneity", &columns) {
                return None;
            }
            self.recover(
                "homogeneity",
                checker.grouped_homogeneity(dataset, &spec.group_column, &spec.value_column),
            )
        });

        Ok(StudyReport {
            alpha,
            transform,
            batteries,
            combined,
            summary,
            tukey,
            two_way,
            normality,
            homogeneity,
        })
    }

    /// Build the indices, then analyze
    #[instrument(skip_all, fields(run_id = %self.bus.context().run_id))]
    pub fn run(&self, dataset: &mut Dataset) -> Result<StudyReport> {
        self.bus.emit(Diagnostic::RunStarted {
            records: dataset.n_records(),
            columns: dataset.n_columns(),
        });

        let transform = self.build_indices(dataset)?;
        let report = self.analyze(dataset, transform)?;

        self.bus.emit(Diagnostic::RunCompleted {
            duration: self.bus.context().elapsed(),
        });
        info!(
            tests = report.summary.total_tests,
            significant = report.summary.significant_tests,
            "study finished"
        );
        Ok(report)
    }

    /// Read a CSV export, run the study and write its tables to `output_dir`
    ///
    /// Writes [`COMPOSITE_FILE`] and [`RESULTS_FILE`], plus [`TUKEY_FILE`]
    /// and [`TWO_WAY_FILE`] when those analyses produced a table.
    pub fn run_files(&self, input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<StudyReport> {
        let output_dir = output_dir.as_ref();
        let mut dataset = survey_io::read_dataset_path(input)?;
        let report = self.run(&mut dataset)?;

        fs::create_dir_all(output_dir)?;
        survey_io::write_dataset_path(&dataset, output_dir.join(COMPOSITE_FILE))?;
        survey_io::write_result_table_path(&report.combined, output_dir.join(RESULTS_FILE))?;
        if let Some(tukey) = &report.tukey {
            survey_io::write_tukey_table(tukey, fs::File::create(output_dir.join(TUKEY_FILE))?)?;
        }
        if let Some(table) = &report.two_way {
            survey_io::write_two_way_table(table, fs::File::create(output_dir.join(TWO_WAY_FILE))?)?;
        }
        Ok(report)
    }

    /// Emit a mismatch for each absent column; true if any was absent
    fn report_absent(&self, dataset: &Dataset, stage: &'static str, columns: &[&str]) -> bool {
        let mut absent = false;
        for column in columns.iter().filter(|c| !dataset.has_column(c)) {
            self.bus.emit(Diagnostic::ConfigurationMismatch {
                stage,
                column: column.to_string(),
            });
            absent = true;
        }
        absent
    }

    fn recover<T>(&self, stage: &'static str, result: survey_core::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.bus.emit(Diagnostic::ComputationFailure {
                    stage,
                    detail: e.to_string(),
                });
                None
            }
        }
    }
}
