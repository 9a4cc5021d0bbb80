//! Error types for survey analysis
//!
//! Provides a unified error type for all survey-stats crates.

use thiserror::Error;

/// Core error type for survey analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A column named by configuration or a caller is not in the dataset
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A composite constituent is absent; downstream indices would be meaningless
    #[error("Missing required column '{column}' for index '{index}'")]
    MissingRequiredColumn { index: String, column: String },

    /// Column exists but holds the wrong kind of data
    #[error("Type mismatch in column '{column}': expected {expected}")]
    TypeMismatch { column: String, expected: &'static str },

    /// Column length differs from the dataset's record count
    #[error("Length mismatch in column '{column}': expected {expected} records, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Value outside the 1-5 response scale
    #[error("Value {value} in column '{column}' (record {record}) is outside the [1, 5] scale")]
    OutOfRange {
        column: String,
        record: usize,
        value: f64,
    },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a non-numeric column
    pub fn not_numeric(column: &str) -> Self {
        Self::TypeMismatch {
            column: column.to_string(),
            expected: "numeric",
        }
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error means a configured column was absent
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_) | Self::MissingRequiredColumn { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("alpha must be in (0, 1)".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: alpha must be in (0, 1)");

        let err = Error::InsufficientData { expected: 2, actual: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 samples, got 1"
        );

        let err = Error::ColumnNotFound("WiFi_Speed_Score".to_string());
        assert_eq!(err.to_string(), "Column not found: WiFi_Speed_Score");

        let err = Error::MissingRequiredColumn {
            index: "Connectivity_Index".to_string(),
            column: "Outage_Frequency_Score_R".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required column 'Outage_Frequency_Score_R' for index 'Connectivity_Index'"
        );

        let err = Error::OutOfRange {
            column: "Time_Lost_Score".to_string(),
            record: 3,
            value: 7.0,
        };
        assert_eq!(
            err.to_string(),
            "Value 7 in column 'Time_Lost_Score' (record 3) is outside the [1, 5] scale"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        match Error::empty_input() {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("Wrong error type"),
        }

        let err = Error::not_numeric("Residence");
        assert_eq!(
            err.to_string(),
            "Type mismatch in column 'Residence': expected numeric"
        );

        let err = Error::non_finite("group means");
        assert_eq!(
            err.to_string(),
            "Computation error: group means contains NaN or infinite values"
        );
    }

    #[test]
    fn test_missing_column_classification() {
        assert!(Error::ColumnNotFound("x".into()).is_missing_column());
        assert!(Error::MissingRequiredColumn {
            index: "i".into(),
            column: "c".into()
        }
        .is_missing_column());
        assert!(!Error::Computation("singular".into()).is_missing_column());
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => assert!(err.to_string().contains("file not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
