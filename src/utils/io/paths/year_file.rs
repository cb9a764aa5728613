//! Naming convention for yearly CSV files
//!
//! Each year lives in its own file named `cleaned_<year>_all.csv`. The year is
//! recovered by splitting the file stem on `_` and parsing the second token.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, YearlyDataError};

/// File name prefix of a year file
pub const YEAR_FILE_PREFIX: &str = "cleaned_";

/// File name suffix of a year file
pub const YEAR_FILE_SUFFIX: &str = "_all.csv";

/// Build the file name for `year`
#[must_use]
pub fn year_file_name(year: i32) -> String {
    format!("{YEAR_FILE_PREFIX}{year}{YEAR_FILE_SUFFIX}")
}

/// Extract the year from a year file name
///
/// Returns `None` for names outside the `cleaned_*_all.csv` pattern or whose
/// second `_`-separated token is not an integer.
#[must_use]
pub fn year_from_file_name(file_name: &str) -> Option<i32> {
    if !file_name.starts_with(YEAR_FILE_PREFIX) || !file_name.ends_with(YEAR_FILE_SUFFIX) {
        return None;
    }

    let stem = Path::new(file_name).file_stem()?.to_str()?;
    stem.split('_').nth(1)?.parse::<i32>().ok()
}

/// Find all year files in a directory, sorted by year
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn find_year_files(dir: &Path) -> Result<Vec<(i32, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| YearlyDataError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| YearlyDataError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(year) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(year_from_file_name)
        else {
            continue;
        };
        files.push((year, path));
    }

    files.sort();
    Ok(files)
}

/// Scan a directory for the years that have a file
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn scan_available_years(dir: &Path) -> Result<Vec<i32>> {
    let years: BTreeSet<i32> = find_year_files(dir)?
        .into_iter()
        .map(|(year, _)| year)
        .collect();
    Ok(years.into_iter().collect())
}
