//! Parallel multi-year loading on a rayon thread pool.

use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use super::{LoadOptions, read_year_file};
use crate::config::LoaderConfig;
use crate::error::{Result, YearlyDataError};
use crate::utils::{create_year_progress_bar, finish_progress_bar};

/// Load one year in a worker
///
/// Opens and fully reads the file; nothing is shared with other workers
/// besides the read-only options. The row cap is not applied.
pub fn load_year_worker(
    year: i32,
    path: &Path,
    config: &LoaderConfig,
    options: &LoadOptions,
) -> Result<RecordBatch> {
    read_year_file(year, path, config, options, None)
}

/// Number of workers for `jobs` year files
#[must_use]
pub fn worker_count(jobs: usize) -> usize {
    jobs.min(num_cpus::get()).max(1)
}

/// Load resolved `(year, path)` jobs on a dedicated pool
///
/// Tables come back in job order. The first failing year aborts the load and
/// is reported as `ParallelWorker`.
pub(crate) fn load_years_parallel(
    jobs: &[(i32, PathBuf)],
    config: &LoaderConfig,
    options: &LoadOptions,
) -> Result<Vec<RecordBatch>> {
    let workers = worker_count(jobs.len());
    log::info!(
        "Loading {} years in parallel with {workers} workers",
        jobs.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("year-loader-{i}"))
        .build()?;

    let pb = create_year_progress_bar(jobs.len() as u64, config.show_progress);

    let result = pool.install(|| {
        jobs.par_iter()
            .map(|(year, path)| {
                pb.set_message(year.to_string());
                let table = load_year_worker(*year, path, config, options).map_err(|source| {
                    log::error!("Error loading year {year}: {source}");
                    YearlyDataError::ParallelWorker {
                        year: *year,
                        source: Box::new(source),
                    }
                });
                pb.inc(1);
                table
            })
            .collect::<Result<Vec<_>>>()
    });

    match &result {
        Ok(_) => finish_progress_bar(&pb, Some("done")),
        Err(_) => pb.abandon(),
    }
    result
}
