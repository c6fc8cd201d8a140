//! Structured error types for dbc-core.
//!
//! Uses `thiserror` so the server and CLI can match on variants.
//! The binary crate wraps these in `anyhow` with extra context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dbc-core operations
#[derive(Error, Debug)]
pub enum DbcError {
    /// I/O operation failed
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// CSV reader or writer failed
    #[error("CSV error in {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// File contained no header row
    #[error("CSV is empty: {path:?}")]
    EmptyFile { path: PathBuf },

    /// One or more required columns are missing from the header
    #[error("Missing headers in {context}: {}", .missing.join(", "))]
    MissingColumns {
        context: String,
        missing: Vec<String>,
    },

    /// A cell could not be converted to the expected type
    #[error("Expected {expected} in column {column}, got '{value}'")]
    InvalidValue {
        column: String,
        expected: &'static str,
        value: String,
    },
}

/// Result type alias for dbc-core operations
pub type Result<T> = std::result::Result<T, DbcError>;

impl DbcError {
    /// Create an I/O error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a CSV error tied to a path
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Create an empty file error
    pub fn empty_file(path: impl Into<PathBuf>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Create a missing columns error
    pub fn missing_columns(context: impl Into<String>, missing: Vec<String>) -> Self {
        Self::MissingColumns {
            context: context.into(),
            missing,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        column: impl Into<String>,
        expected: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            column: column.into(),
            expected,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbcError::missing_columns(
            "01_DBC.csv",
            vec!["JAAR".to_string(), "PEILDATUM".to_string()],
        );
        assert_eq!(err.to_string(), "Missing headers in 01_DBC.csv: JAAR, PEILDATUM");

        let err = DbcError::invalid_value("JAAR", "integer", "twintig");
        assert_eq!(
            err.to_string(),
            "Expected integer in column JAAR, got 'twintig'"
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = DbcError::io("/tmp/missing.csv", io_err);

        assert!(matches!(err, DbcError::Io { .. }));
        assert!(err.to_string().contains("/tmp/missing.csv"));
    }
}
