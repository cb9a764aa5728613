//! Error handling for the yearly dataset loader.

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use itertools::Itertools;

/// Specialized error type for loading yearly CSV files
#[derive(Debug, thiserror::Error)]
pub enum YearlyDataError {
    /// The configured data directory does not exist
    #[error("Data directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No file exists for the requested year
    #[error("No data file found for year {year}. Available years: [{}]", format_years(.available))]
    FileNotFound {
        /// The requested year
        year: i32,
        /// Years that do have a file in the data directory
        available: Vec<i32>,
    },

    /// An operation needed a default year but the directory holds no year files
    #[error("No year files found in {}", .0.display())]
    NoYearsAvailable(PathBuf),

    /// The CSV reader failed (malformed row, type coercion failure)
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying Arrow error
        #[source]
        source: ArrowError,
    },

    /// A projected column does not exist in the file
    #[error("Column '{column}' not found in {}", .path.display())]
    ColumnNotFound {
        /// Missing column name
        column: String,
        /// File that was inspected
        path: PathBuf,
    },

    /// A worker in a parallel multi-year load failed
    #[error("Error loading year {year}: {source}")]
    ParallelWorker {
        /// Year whose load failed
        year: i32,
        /// The worker's own error
        #[source]
        source: Box<YearlyDataError>,
    },

    /// The worker pool for a parallel load could not be created
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A blocking load task panicked or was cancelled
    #[error("Load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A caller supplied an argument of an unsupported shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error opening or reading a file
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error from an Arrow compute kernel
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error evaluating a row filter
    #[error("Filter error: {0}")]
    Filter(String),
}

impl YearlyDataError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap an Arrow error raised while parsing `path`
    pub fn parse(path: impl AsRef<Path>, source: ArrowError) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a filter error
    pub fn filter_error(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

fn format_years(years: &[i32]) -> String {
    years.iter().join(", ")
}

/// Result type for yearly dataset operations
pub type Result<T> = std::result::Result<T, YearlyDataError>;
