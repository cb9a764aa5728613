//! Configuration for `YearlyDataset`.

use std::path::PathBuf;

use crate::error::{Result, YearlyDataError};
use crate::utils::{DEFAULT_BATCH_SIZE, get_batch_size};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "YEARLY_CSV_DATA_DIR";

/// Default number of rows per chunk for chunked iteration
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Default seed used when sampling rows
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Configuration for the `YearlyDataset`
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory containing the `cleaned_<year>_all.csv` files
    pub data_dir: PathBuf,
    /// Rows per record batch when reading a full file
    pub batch_size: usize,
    /// Rows per chunk for `iter_year_chunks` when no size is given
    pub chunk_size: usize,
    /// Seed for `sample_year`
    pub sample_seed: u64,
    /// Maximum number of records scanned for type inference (`None` scans the whole file)
    pub schema_inference_rows: Option<usize>,
    /// Field delimiter
    pub delimiter: u8,
    /// Show a progress bar during parallel multi-year loads
    pub show_progress: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_seed: DEFAULT_SAMPLE_SEED,
            schema_inference_rows: None,
            delimiter: b',',
            show_progress: false,
        }
    }
}

impl LoaderConfig {
    /// Default configuration reading from `data_dir`
    #[must_use]
    pub fn for_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Check the numeric settings
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a zero batch or chunk size
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(YearlyDataError::invalid_argument("batch size must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(YearlyDataError::invalid_argument("chunk size must be positive"));
        }
        Ok(())
    }
}

/// Resolve the default data directory
///
/// Uses `$YEARLY_CSV_DATA_DIR` when set, otherwise `data/cleaned` under the
/// current working directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("data")
        .join("cleaned")
}
