//! Async multi-year loading
//!
//! Each year is read on tokio's blocking pool, so callers inside an async
//! runtime can load several years without stalling their executor.

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use futures::stream::{self, StreamExt};
use itertools::Itertools;

use crate::dataset::parallel::worker_count;
use crate::dataset::{LoadOptions, YearlyDataset, load_year_worker};
use crate::error::{Result, YearlyDataError};
use crate::utils::{concat_tables, log_table_loaded};

/// Load several years concurrently and concatenate them in request order
///
/// At most `min(years, cpus)` files are read at once. Results arrive in
/// completion order and are put back in request order before concatenation.
///
/// # Errors
/// Returns `FileNotFound` before any read starts if a year has no file, and
/// `ParallelWorker` naming the year if a read fails
pub async fn load_years_async(
    dataset: &YearlyDataset,
    years: &[i32],
    options: LoadOptions,
) -> Result<RecordBatch> {
    let jobs = years
        .iter()
        .map(|&year| Ok((year, dataset.year_path(year)?)))
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Loading {} years asynchronously from {}",
        jobs.len(),
        dataset.data_dir().display()
    );

    let config = Arc::new(dataset.config().clone());
    let options = Arc::new(options);
    let concurrency = worker_count(jobs.len());

    let mut results = stream::iter(jobs.into_iter().enumerate())
        .map(|(index, (year, path))| {
            let config = Arc::clone(&config);
            let options = Arc::clone(&options);
            async move {
                let result = tokio::task::spawn_blocking(move || {
                    load_year_worker(year, &path, &config, &options)
                })
                .await
                .map_err(YearlyDataError::from)
                .and_then(|result| result);
                (index, year, result)
            }
        })
        .buffer_unordered(concurrency)
        .collect::<Vec<_>>()
        .await;

    results.sort_by_key(|(index, _, _)| *index);

    let tables = results
        .into_iter()
        .map(|(_, year, result)| {
            result.map_err(|source| {
                log::error!("Error loading year {year}: {source}");
                YearlyDataError::ParallelWorker {
                    year,
                    source: Box::new(source),
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let combined = concat_tables(&tables)?;
    log_table_loaded(
        &format!("years [{}]", years.iter().join(", ")),
        combined.num_rows(),
        combined.num_columns(),
        None,
    );
    Ok(combined)
}
