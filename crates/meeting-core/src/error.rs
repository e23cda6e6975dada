use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the meeting analyzer.
#[derive(Error, Debug)]
pub enum MeetingError {
    /// The calendar export could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV document itself is malformed (bad quoting, invalid UTF-8, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column header is absent from the export.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A date/time cell pair did not match `MM/DD/YYYY hh:mm:ss AM/PM`.
    #[error("Invalid timestamp on line {line}: {value:?}")]
    TimestampParse { line: u64, value: String },

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the meeting crates.
pub type Result<T> = std::result::Result<T, MeetingError>;
