//! Logging utilities
//!
//! Standardized progress lines for load operations. All output goes through the
//! `log` facade so callers decide where it ends up (or silence it).

use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file
pub fn log_operation_start(operation: &str, path: &Path) {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    log::info!("{operation} from {name}...");
}

/// Log the shape of a loaded table
///
/// # Arguments
/// * `label` - What was loaded (e.g. the year)
/// * `rows` - Number of rows in the result
/// * `columns` - Number of columns in the result
/// * `elapsed` - Optional elapsed time
pub fn log_table_loaded(label: &str, rows: usize, columns: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("  Loaded {label}: {rows} rows, {columns} columns in {duration:?}");
    } else {
        log::info!("  Loaded {label}: {rows} rows, {columns} columns");
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
