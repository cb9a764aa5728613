//! Core filtering functionality
//!
//! Row filters run after a year has been read. A filter takes the full table
//! and returns the subset of rows to keep.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::{Result, YearlyDataError};

/// Filter a record batch based on a boolean mask
///
/// Rows where the mask is false or null are dropped.
///
/// # Errors
/// Returns an error if the mask length does not match the batch
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(YearlyDataError::filter_error(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
///
/// Filters are shared with worker threads during parallel loads, so
/// implementations must be `Send + Sync`.
pub trait BatchFilter: fmt::Debug + Send + Sync {
    /// Filter a record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String> {
        HashSet::new()
    }
}

/// Shared, thread-safe filter handle
pub type SharedFilter = Arc<dyn BatchFilter>;

/// Signature of a named row filter function
pub type FilterFn = fn(&RecordBatch) -> Result<RecordBatch>;

/// Filter backed by a plain function item
///
/// Only `fn` pointers are accepted, not closures, so the filter never
/// captures state that could not be shared with worker threads.
#[derive(Clone, Copy)]
pub struct FnFilter {
    name: &'static str,
    func: FilterFn,
}

impl FnFilter {
    /// Wrap a named filter function
    #[must_use]
    pub const fn new(name: &'static str, func: FilterFn) -> Self {
        Self { name, func }
    }

    /// Name used in logs and debug output
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for FnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}

impl BatchFilter for FnFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        (self.func)(batch)
    }
}

/// A filter that always includes all rows
#[derive(Debug, Clone, Default)]
pub struct IncludeAllFilter;

impl BatchFilter for IncludeAllFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        Ok(batch.clone())
    }
}

/// A filter that applies several filters in sequence
#[derive(Debug, Clone)]
pub struct AndFilter {
    filters: Vec<SharedFilter>,
}

impl AndFilter {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<SharedFilter>) -> Self {
        Self { filters }
    }
}

impl BatchFilter for AndFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut result_batch = batch.clone();

        for filter in &self.filters {
            if result_batch.num_rows() == 0 {
                break;
            }
            result_batch = filter.filter(&result_batch)?;
        }

        Ok(result_batch)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.filters
            .iter()
            .flat_map(|filter| filter.required_columns())
            .collect()
    }
}
