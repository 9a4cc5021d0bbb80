//! Survey index construction and ANOVA test battery
//!
//! This crate ties the survey-stats workspace together:
//!
//! - [`survey_core`]: dataset, configuration, errors and diagnostics
//! - [`survey_index`]: rescaling, reverse coding, composite indices, terciles
//! - [`survey_anova`]: one-way and two-way ANOVA, Tukey HSD, assumption checks
//! - [`survey_io`]: CSV and JSON input/output
//!
//! [`StudyPipeline`] runs a whole study from one [`AnalysisConfig`].
//!
//! # Example
//!
//! ```rust
//! use survey_stats::{survey_io, Column, Dataset, StudyPipeline};
//!
//! let mut ds = Dataset::from_columns([
//!     ("speed", Column::from_values(&[1.0, 1.0, 1.0, 2.0, 2.0, 2.0])),
//!     ("score", Column::from_values(&[1.0, 2.0, 1.5, 4.0, 5.0, 4.5])),
//! ]).unwrap();
//!
//! let config = survey_io::read_config(r#"{
//!     "score_columns": [{"name": "score"}],
//!     "composites": [{"name": "Score_Index", "constituents": ["score"]}],
//!     "independent_groups": [{"name": "Speed", "columns": ["speed"]}],
//!     "dependent_groups": [{"name": "Outcome", "columns": ["Score_Index"]}],
//!     "batteries": [{"name": "main", "independent": ["Speed"], "dependent": ["Outcome"]}]
//! }"#.as_bytes()).unwrap();
//!
//! let report = StudyPipeline::new(config).unwrap().run(&mut ds).unwrap();
//! assert_eq!(report.summary.total_tests, 1);
//! assert_eq!(report.summary.significant_tests, 1);
//! ```

pub mod error;
pub mod pipeline;

pub use survey_anova;
pub use survey_core;
pub use survey_index;
pub use survey_io;

pub use error::{Error, Result};
pub use pipeline::{BatteryReport, StudyPipeline, StudyReport};

pub use survey_anova::{
    AnovaEngine, AnovaResult, AssumptionChecker, BatterySummary, PostHocAnalyzer, ResultTable,
    TukeyTable, TwoWayTable,
};
pub use survey_core::{
    AnalysisConfig, CollectingReporter, Column, Dataset, Diagnostic, DiagnosticBus,
    LoggingReporter, Reporter,
};
pub use survey_index::{IndexPipeline, TransformSummary};
