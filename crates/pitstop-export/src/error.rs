use std::path::PathBuf;

use thiserror::Error;

/// Reasons an event payload yields no table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("event payload is not a JSON object")]
    NotAnObject,

    #[error("'htmlList' -> 'table' is missing or empty")]
    Missing,

    #[error("the value at 'htmlList' -> 'table' is not a string")]
    NotAString,

    #[error("no <table> element found in the HTML string")]
    NoTableElement,
}

/// Errors writing extracted records to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The race name cannot be used as a file name.
    #[error("invalid output file name '{0}'")]
    InvalidFileName(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}
