//! Survey index construction
//!
//! Turns raw survey responses into comparable scores and composite indices.
//!
//! # Steps
//!
//! - **Rescaling**: min-max onto the 1-5 response scale; constant columns
//!   collapse to the midpoint 3
//! - **Reverse coding**: `6 - v` for negatively phrased items, stored in a
//!   suffixed copy (`Outage_Frequency_Score_R`)
//! - **Composite indices**: per-record mean of the present constituents
//! - **Terciles**: equal-frequency Low/Medium/High labels of one index
//!
//! [`IndexPipeline`] runs all of them over a [`survey_core::Dataset`] as
//! configured by a [`survey_core::AnalysisConfig`].
//!
//! # Example
//!
//! ```rust
//! use survey_index::{rescale, reverse};
//!
//! let scaled = rescale(&[Some(10.0), Some(20.0), Some(20.0), Some(30.0)]);
//! assert_eq!(scaled, vec![Some(1.0), Some(3.0), Some(3.0), Some(5.0)]);
//! assert_eq!(reverse(&[Some(4.0)]), vec![Some(2.0)]);
//! ```

pub mod composite;
pub mod pipeline;
pub mod reverse;
pub mod scale;
pub mod tercile;

pub use composite::{build_index, mean_present, CompositeBuilder};
pub use pipeline::{IndexPipeline, TransformSummary};
pub use reverse::{reverse, reverse_value, ReverseCoder};
pub use scale::{is_degenerate, needs_rescale, observed_range, rescale};
pub use tercile::{quantile_linear, tercile_edges, tercile_labels, Tercile, TercileEdges};
