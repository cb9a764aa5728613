//! IO utilities for file operations
//!
//! This module provides utilities for working with the data directory and
//! the raw bytes of year files.

pub mod paths;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, YearlyDataError};

// Re-export commonly used functions for convenience
pub use paths::{find_year_files, scan_available_years, year_file_name, year_from_file_name};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Validates that a directory exists and is a directory
///
/// # Errors
/// Returns `DirectoryNotFound` if the directory does not exist or is not a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.exists() || !dir.is_dir() {
        return Err(YearlyDataError::DirectoryNotFound(dir.to_path_buf()));
    }
    Ok(())
}

/// Open a file for reading
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| YearlyDataError::io(path, e))
}

/// Size of a file in megabytes, rounded to two decimals
pub fn file_size_mb(path: &Path) -> Result<f64> {
    let bytes = std::fs::metadata(path)
        .map_err(|e| YearlyDataError::io(path, e))?
        .len();
    Ok(round2(bytes as f64 / BYTES_PER_MB))
}

/// Count the physical lines of a file
///
/// A final line without a trailing newline still counts. Quoted fields with
/// embedded newlines are counted as several lines.
pub fn count_lines(path: &Path) -> Result<usize> {
    let mut reader = BufReader::new(open_file(path)?);
    let mut lines = 0;
    let mut last_byte = None;

    loop {
        let buf = reader.fill_buf().map_err(|e| YearlyDataError::io(path, e))?;
        if buf.is_empty() {
            break;
        }
        lines += buf.iter().filter(|&&b| b == b'\n').count();
        last_byte = buf.last().copied();
        let len = buf.len();
        reader.consume(len);
    }

    if last_byte.is_some_and(|b| b != b'\n') {
        lines += 1;
    }
    Ok(lines)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
