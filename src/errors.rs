//! # Extraction Error Types Module
//!
//! This module defines the error types used by the extraction pipeline.
//! Malformed row data never produces an error: rows that cannot be interpreted
//! are recovered locally and only counted. The variants below are the fatal
//! cases plus the empty-result condition the operator must be told about.

use std::path::PathBuf;

/// Custom error types for extraction operations
#[derive(Debug)]
pub enum ExtractionError {
    /// Input file does not exist
    InputNotFound(PathBuf),
    /// Input file exists but could not be opened or read
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Output table could not be written or persisted
    OutputWrite {
        path: PathBuf,
        message: String,
    },
    /// Nothing survived extraction and filtering
    EmptyResult(String),
    /// Settings that cannot produce a valid run
    InvalidConfig(String),
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::InputNotFound(path) => {
                write!(f, "Input file not found: {}", path.display())
            }
            ExtractionError::InputRead { path, source } => {
                write!(f, "Failed to read input {}: {source}", path.display())
            }
            ExtractionError::OutputWrite { path, message } => {
                write!(f, "Failed to write output {}: {message}", path.display())
            }
            ExtractionError::EmptyResult(msg) => write!(f, "Empty result: {msg}"),
            ExtractionError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::InputRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ExtractionError {
    /// Wrap an I/O failure on the input side, mapping `NotFound` to its own variant
    pub fn input(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            ExtractionError::InputNotFound(path)
        } else {
            ExtractionError::InputRead { path, source: err }
        }
    }

    /// Wrap any displayable failure on the output side
    pub fn output(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExtractionError::OutputWrite {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_maps_to_dedicated_variant() {
        let err = ExtractionError::input("missing.csv", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ExtractionError::InputNotFound(_)));
        assert_eq!(err.to_string(), "Input file not found: missing.csv");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = ExtractionError::input(
            "recipes.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ExtractionError::InputRead { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_output_error_message() {
        let err = ExtractionError::output("out/table.csv", "disk full");
        assert_eq!(err.to_string(), "Failed to write output out/table.csv: disk full");
    }
}
