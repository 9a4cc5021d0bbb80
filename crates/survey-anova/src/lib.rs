//! Hypothesis tests over survey datasets
//!
//! This crate runs the statistical side of a survey study:
//!
//! - **One-way ANOVA**: Fisher's F test of a dependent variable across the
//!   groups of an independent variable, with an approximate eta-squared
//! - **Batteries**: every independent/dependent pairing of two variable
//!   lists, collected in a [`ResultTable`]
//! - **Tukey HSD**: pairwise follow-up of one pairing, with p-values from
//!   the studentized range distribution
//! - **Two-way ANOVA**: main effects and interaction with Type-II sums of
//!   squares
//! - **Assumption checks**: Shapiro-Wilk normality and Levene homogeneity
//!
//! Each estimator sits behind a provider trait so alternatives can be
//! plugged into [`AnovaEngine`], [`PostHocAnalyzer`] and
//! [`AssumptionChecker`].
//!
//! # Example
//!
//! ```rust
//! use survey_anova::AnovaEngine;
//! use survey_core::{Column, Dataset};
//!
//! let ds = Dataset::from_columns([
//!     ("speed", Column::from_values(&[1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0])),
//!     ("score", Column::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])),
//! ]).unwrap();
//!
//! let engine = AnovaEngine::new(0.05).unwrap();
//! let table = engine.run_battery(&ds, &["speed"], &["score"]);
//! let result = &table.results()[0];
//! assert!((result.f_statistic - 27.0).abs() < 1e-10);
//! assert!(result.significant);
//! ```

pub mod assumptions;
pub mod battery;
pub mod engine;
pub mod one_way;
pub mod partition;
pub mod posthoc;
pub mod studentized_range;
pub mod traits;
pub mod two_way;
pub mod types;

pub use assumptions::{AssumptionChecker, Center, Levene, ShapiroWilk};
pub use battery::{BatterySummary, ResultTable};
pub use engine::AnovaEngine;
pub use one_way::{effect_size, f_upper_tail, FisherAnova};
pub use partition::{partition, partition_with_labels, Partition};
pub use posthoc::{PairwiseComparison, PostHocAnalyzer, TukeyHsd, TukeyTable};
pub use studentized_range::{ptukey, qtukey};
pub use traits::{
    HomogeneityTestProvider, NormalityTestProvider, OneWayAnovaProvider, PostHocProvider,
};
pub use two_way::{CellSummary, EffectRow, TwoWayAnova, TwoWayTable};
pub use types::{AnovaResult, GroupSummary, OneWayOutcome, OneWayStatistics, TestStatistic};
