//! Error types for Tactix

use thiserror::Error;

/// Errors that can occur while loading match data or computing reports
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{field} value {value} is outside the expected range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Snapshot error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Build an `OutOfRange` error for a named field
    pub fn out_of_range(field: &str, value: f64, min: f64, max: f64) -> Self {
        AnalysisError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = AnalysisError::out_of_range("x", 101.5, 0.0, 100.0);
        assert_eq!(
            err.to_string(),
            "x value 101.5 is outside the expected range [0, 100]"
        );
    }
}
