//! Error types for archive ingestion

use thiserror::Error;

/// Errors that can occur while normalizing or merging mailing lists
#[derive(Error, Debug)]
pub enum IngestError {
    /// A table ended up with columns of unequal length
    #[error("Column {column} has {found} rows, expected {expected}")]
    SchemaInconsistency {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A date passed the coarse filter but not the strict parse
    #[error("Invalid date in row {row}: {value:?}: {source}")]
    DateParse {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A single message could not be parsed or rendered
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// An operation needed a column the table does not have
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A row mask does not cover the table
    #[error("Row mask has {found} entries, table has {expected} rows")]
    MaskLength { expected: usize, found: usize },

    /// Options or table rows could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;
