//! Utility functions for the yearly dataset loader
//!
//! This module contains helpers shared by the loader:
//! - `arrow`: concatenating and sampling tables
//! - `io`: the data directory and year file naming
//! - `logging`: progress lines and progress bars

pub mod arrow;
pub mod io;
pub mod logging;

// Re-export commonly used items for convenience
pub use self::arrow::{concat_tables, sample_rows};
pub use self::io::{
    count_lines, file_size_mb, find_year_files, open_file, scan_available_years,
    validate_directory, year_file_name, year_from_file_name,
};
pub use self::logging::{
    create_year_progress_bar, finish_progress_bar, log_operation_start, log_table_loaded,
    log_warning,
};

/// Environment variable overriding the CSV read batch size
pub const BATCH_SIZE_ENV: &str = "YEARLY_CSV_BATCH_SIZE";

/// Default batch size for CSV reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var(BATCH_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&size| size > 0)
}
