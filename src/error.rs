//! Error types for the training pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the training pipeline
///
/// Every variant is fatal: a step either completes or the run aborts with
/// the first error it hits. There is no retry or partial-success state.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Required column '{0}' not found in training data")]
    MissingColumn(String),

    #[error("Degenerate dataset: {0}")]
    DegenerateData(String),

    #[error("Missing artifact: {} (run the producing training step first)", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Model not fitted")]
    NotFitted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(err: ndarray::ShapeError) -> Self {
        PipelineError::Shape {
            expected: "compatible shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::MissingColumn("volatility".to_string());
        assert_eq!(
            err.to_string(),
            "Required column 'volatility' not found in training data"
        );
    }

    #[test]
    fn test_missing_artifact_names_path() {
        let err = PipelineError::MissingArtifact(PathBuf::from("models/scaler.bin"));
        assert!(err.to_string().contains("models/scaler.bin"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
