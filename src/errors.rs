//! Error types for corpus processing.
//!
//! Only file-level failures are errors. Row- and relationship-level problems
//! are collected as [`crate::Diagnostic`] values and never abort a run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop processing of a single file.
#[derive(Debug, Error)]
pub enum ClauseMateError {
    /// Reading an input or config file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No known column layout matches the file.
    #[error("{source_name}: line {line}: {column_count} columns match no known layout")]
    SchemaClassification {
        source_name: String,
        line: usize,
        column_count: usize,
    },

    /// A configuration file could not be parsed.
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A record could not be written to its destination.
    #[error("failed to write output: {message}")]
    Output { message: String },
}

impl ClauseMateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn output(message: impl std::fmt::Display) -> Self {
        Self::Output {
            message: message.to_string(),
        }
    }

    /// Returns true for errors raised by layout classification.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::SchemaClassification { .. })
    }
}

/// Result type for corpus operations.
pub type ClauseMateResult<T> = Result<T, ClauseMateError>;
