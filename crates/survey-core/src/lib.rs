//! Core types for survey index construction and ANOVA analysis
//!
//! This crate holds what every other survey-stats crate shares:
//!
//! - [`Dataset`]: the in-memory table, numeric cells as `Option<f64>`
//! - [`AnalysisConfig`]: the immutable column lists driving a run
//! - [`Error`]: the unified error type
//! - [`DiagnosticBus`]: structured, non-fatal diagnostics
//!
//! # Example
//!
//! ```rust
//! use survey_core::{Column, Dataset};
//!
//! let ds = Dataset::from_columns([
//!     ("WiFi_Speed_Score", Column::from_values(&[1.0, 2.0, 4.0])),
//! ]).unwrap();
//! assert_eq!(ds.n_records(), 3);
//! ```

pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod error;

pub use config::{
    AnalysisConfig, BatteryPlan, CompositeSpec, HomogeneitySpec, Polarity, RangePolicy,
    ScoreColumn, TercileSpec, TwoWaySpec, VariableGroup,
};
pub use dataset::{Column, Dataset, GroupKey, Record};
pub use diagnostics::{
    CollectingReporter, Diagnostic, DiagnosticBus, LoggingReporter, NullReporter, Reporter,
    RunContext,
};
pub use error::{Error, Result};

/// Lower bound of the response scale
pub const SCALE_MIN: f64 = 1.0;
/// Upper bound of the response scale
pub const SCALE_MAX: f64 = 5.0;
/// Value assigned to constant columns
pub const SCALE_MIDPOINT: f64 = 3.0;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
