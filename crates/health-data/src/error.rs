//! Error types for the health-data crate.
//!
//! Loading a dataset can fail in a few distinct ways: the file is
//! missing, it can't be read, the JSON is malformed, or the records
//! themselves break an invariant (duplicate ids, ratings off the 0-5
//! scale, coordinates outside the globe).

use thiserror::Error;

/// Errors that can occur while loading and indexing a dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File contents were not the JSON we expected
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two records share the same identifier
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: String, id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
