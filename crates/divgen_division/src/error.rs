//! Error types for the division pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a division run.
#[derive(Debug, Error)]
pub enum DivisionError {
    // === Source Errors ===
    /// Registration export does not exist.
    #[error("registration file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Registration export exists but could not be read.
    #[error("failed to read registration file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parser rejected the registration export.
    #[error("failed to parse registration CSV {path}: {message}")]
    SourceParse { path: PathBuf, message: String },

    /// A column the pipeline cannot run without is absent.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    // === Layout Errors ===
    /// Two belt buckets where one name is a prefix of the other.
    #[error("belt bucket '{prefix}' is a prefix of belt bucket '{bucket}'")]
    AmbiguousBeltBucket { prefix: String, bucket: String },

    /// A belt rank that starts with no configured bucket name.
    #[error("belt level '{belt}' does not start with any belt bucket")]
    UnmappedBeltLevel { belt: String },

    /// Division name configured more than once.
    #[error("division '{name}' is configured more than once")]
    DuplicateDivision { name: String },

    // === Output Errors ===
    /// Output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDirInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be written.
    #[error("failed to write workbook {path}: {message}")]
    XlsxWrite { path: PathBuf, message: String },
}

impl From<polars::prelude::PolarsError> for DivisionError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for division operations.
pub type Result<T> = std::result::Result<T, DivisionError>;
