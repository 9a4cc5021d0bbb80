//! CSV and JSON input/output for survey analysis
//!
//! Reads raw survey exports into a [`survey_core::Dataset`], writes the
//! transformed dataset and the ANOVA result tables back out as CSV, and
//! loads [`survey_core::AnalysisConfig`] files.
//!
//! # Example
//!
//! ```rust
//! use survey_io::{read_dataset, write_dataset};
//!
//! let ds = read_dataset("WiFi_Speed_Score,Residence\n4,Hostel\nNA,Home\n".as_bytes()).unwrap();
//! assert_eq!(ds.numeric("WiFi_Speed_Score").unwrap(), &[Some(4.0), None]);
//!
//! let mut out = Vec::new();
//! write_dataset(&ds, &mut out).unwrap();
//! ```

mod config;
mod dataset;
mod error;
mod results;

pub use config::{read_config, read_config_path, write_config};
pub use dataset::{
    read_dataset, read_dataset_path, write_dataset, write_dataset_path, DatasetReader,
    MISSING_TOKENS,
};
pub use error::{Error, Result};
pub use results::{
    write_result_table, write_result_table_path, write_tukey_table, write_two_way_table,
};
