use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Record-level failures
// ---------------------------------------------------------------------------

/// A timestamp cell that could not be turned into a local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("unrecognised timestamp '{0}'")]
    Unrecognised(String),
    /// The wall-clock time does not exist in the reference zone and no
    /// valid instant could be found after it.
    #[error("local time '{0}' cannot be placed in the reference zone")]
    Unrepresentable(String),
}

/// A temperature cell that could not be coerced to a finite number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemperatureError {
    #[error("empty temperature")]
    Empty,
    #[error("'{0}' is not a number")]
    Invalid(String),
    #[error("'{0}' is not a finite number")]
    NotFinite(String),
}

/// Why one record was dropped from its file's aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("row {row}: {source}")]
    Timestamp {
        row: usize,
        #[source]
        source: TimestampError,
    },
    #[error("row {row}: {source}")]
    Temperature {
        row: usize,
        #[source]
        source: TemperatureError,
    },
}

impl ParseFailure {
    /// Zero-based data row (header excluded) the failure belongs to.
    pub fn row(&self) -> usize {
        match self {
            ParseFailure::Timestamp { row, .. } | ParseFailure::Temperature { row, .. } => *row,
        }
    }
}

// ---------------------------------------------------------------------------
// File-level failures
// ---------------------------------------------------------------------------

/// A required column could not be located in a file's headers.
///
/// The payload is the role that was searched for: `"time"` or
/// `"temperature"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no '{0}' column found")]
pub struct ColumnNotFound(pub &'static str);

/// A whole file was rejected. Sibling files are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(String),
    #[error("file has no header row")]
    NoHeader,
    #[error(transparent)]
    ColumnNotFound(#[from] ColumnNotFound),
}

// `csv::Error` is not `Clone`; cached results are handed out by clone, so the
// message is kept instead.
impl From<csv::Error> for FileError {
    fn from(e: csv::Error) -> Self {
        FileError::Csv(e.to_string())
    }
}

impl Clone for FileError {
    fn clone(&self) -> Self {
        match self {
            FileError::Io { path, source } => FileError::Io {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            FileError::Csv(msg) => FileError::Csv(msg.clone()),
            FileError::NoHeader => FileError::NoHeader,
            FileError::ColumnNotFound(c) => FileError::ColumnNotFound(c.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Run-level failures
// ---------------------------------------------------------------------------

/// Terminal state of one pipeline run: no series can be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("no valid data could be read from the opened files")]
    EmptyCombinedSeries,
}

/// Writing a filter result to disk failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("unsupported export extension: .{0}")]
    UnsupportedExtension(String),
}
