//! Error types for the stratify library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stratify operations.
#[derive(Debug, Error)]
pub enum StratifyError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to reshape.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The extract does not have the expected wide layout.
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal problems with the shape of the input extract.
///
/// Bad *values* never land here: an estimate that fails to parse is
/// dropped from the clean table and recorded as a filtered row instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A label did not split into exactly `<entity>!!<metric>`.
    #[error("label '{label}' splits into {parts} part(s), expected 2")]
    MalformedLabel { label: String, parts: usize },

    /// A required metric column is absent after the pivot.
    #[error("required metric '{0}' not found in any label")]
    MissingMetric(String),

    /// The same entity/metric pair appears more than once.
    #[error("duplicate entry for entity '{entity}', metric '{metric}'")]
    DuplicateEntry { entity: String, metric: String },

    /// The wide extract must hold exactly one data row.
    #[error("expected exactly one data row, found {0}")]
    UnexpectedShape(usize),
}

/// Result type alias for stratify operations.
pub type Result<T> = std::result::Result<T, StratifyError>;
