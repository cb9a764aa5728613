//! Path utilities for locating year files

pub mod year_file;

// Re-export commonly used functions for convenience
pub use year_file::{
    YEAR_FILE_PREFIX, YEAR_FILE_SUFFIX, find_year_files, scan_available_years, year_file_name,
    year_from_file_name,
};
