//! The yearly dataset facade.
//!
//! A [`YearlyDataset`] points at a directory of `cleaned_<year>_all.csv` files
//! and loads them as Arrow tables, one year at a time or several years at once.

pub mod chunks;
pub mod parallel;
pub mod quick;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::Serialize;

use crate::config::LoaderConfig;
use crate::error::{Result, YearlyDataError};
use crate::filter::{BatchFilter, SharedFilter};
use crate::reader::{CsvYearReader, DtypeHints, read_header};
use crate::utils::{
    concat_tables, count_lines, file_size_mb, log_operation_start, log_table_loaded, sample_rows,
    scan_available_years, validate_directory, year_file_name,
};

pub use self::chunks::YearChunks;
pub use self::parallel::load_year_worker;
pub use self::quick::{YearSpec, quick_load};

/// Options shared by the single- and multi-year loads
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Columns to read; `None` reads every column
    pub columns: Option<Vec<String>>,
    /// Row filter applied after reading
    pub filter: Option<SharedFilter>,
    /// Stop reading after this many rows (single-year loads only)
    pub row_cap: Option<usize>,
    /// Per-column type overrides
    pub dtypes: Option<DtypeHints>,
}

impl LoadOptions {
    /// Options that read everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read the given columns
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Keep only the rows selected by `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: impl BatchFilter + 'static) -> Self {
        self.filter = Some(std::sync::Arc::new(filter));
        self
    }

    /// Keep only the rows selected by an already shared filter
    #[must_use]
    pub fn with_shared_filter(mut self, filter: SharedFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Read at most `rows` rows
    #[must_use]
    pub fn with_row_cap(mut self, rows: usize) -> Self {
        self.row_cap = Some(rows);
        self
    }

    /// Override inferred column types
    #[must_use]
    pub fn with_dtypes(mut self, dtypes: DtypeHints) -> Self {
        self.dtypes = Some(dtypes);
        self
    }
}

/// Metadata about one year file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearInfo {
    pub year: i32,
    pub path: PathBuf,
    /// File size in megabytes, rounded to two decimals
    pub size_mb: f64,
    /// Physical line count minus the header; approximate when fields contain newlines
    pub estimated_rows: usize,
    pub column_count: usize,
}

/// Loader for a directory of yearly CSV files
#[derive(Debug, Clone)]
pub struct YearlyDataset {
    config: LoaderConfig,
    available_years: Vec<i32>,
}

impl YearlyDataset {
    /// Open a data directory
    ///
    /// `None` uses the default directory (see [`crate::config::default_data_dir`]).
    ///
    /// # Errors
    /// Returns `DirectoryNotFound` if the directory does not exist
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let config = match data_dir {
            Some(dir) => LoaderConfig::for_dir(dir),
            None => LoaderConfig::default(),
        };
        Self::with_config(config)
    }

    /// Open the directory named by `config.data_dir`
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a zero batch or chunk size and
    /// `DirectoryNotFound` if the directory does not exist
    pub fn with_config(config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        validate_directory(&config.data_dir)?;
        let available_years = scan_available_years(&config.data_dir)?;
        log::debug!(
            "Found {} year files in {}",
            available_years.len(),
            config.data_dir.display()
        );

        Ok(Self {
            config,
            available_years,
        })
    }

    /// Directory holding the year files
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Years with a data file, ascending
    #[must_use]
    pub fn available_years(&self) -> &[i32] {
        &self.available_years
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Rescan the directory for year files
    pub fn refresh_years(&mut self) -> Result<&[i32]> {
        validate_directory(&self.config.data_dir)?;
        self.available_years = scan_available_years(&self.config.data_dir)?;
        Ok(&self.available_years)
    }

    /// Path of the file for `year`
    ///
    /// # Errors
    /// Returns `FileNotFound` listing the available years if there is no file
    pub fn year_path(&self, year: i32) -> Result<PathBuf> {
        let path = self.config.data_dir.join(year_file_name(year));
        if !path.is_file() {
            return Err(YearlyDataError::FileNotFound {
                year,
                available: self.available_years.clone(),
            });
        }
        Ok(path)
    }

    /// Load one year into a table
    ///
    /// Columns, dtype hints and the row cap are applied while reading. The
    /// filter runs on the loaded table.
    pub fn load_year(&self, year: i32, options: &LoadOptions) -> Result<RecordBatch> {
        let path = self.year_path(year)?;
        read_year_file(year, &path, &self.config, options, options.row_cap)
    }

    /// Load several years and concatenate them in request order
    ///
    /// Every year is resolved before any file is read. With `parallel` set and
    /// more than one year, files are read on a worker pool. The row cap is
    /// not applied here.
    pub fn load_years(
        &self,
        years: &[i32],
        options: &LoadOptions,
        parallel: bool,
    ) -> Result<RecordBatch> {
        let jobs = years
            .iter()
            .map(|&year| Ok((year, self.year_path(year)?)))
            .collect::<Result<Vec<_>>>()?;

        let start = Instant::now();
        let tables = if parallel && jobs.len() > 1 {
            parallel::load_years_parallel(&jobs, &self.config, options)?
        } else {
            jobs.iter()
                .map(|(year, path)| read_year_file(*year, path, &self.config, options, None))
                .collect::<Result<Vec<_>>>()?
        };

        let combined = concat_tables(&tables)?;
        log_table_loaded(
            &format!("years [{}]", years.iter().join(", ")),
            combined.num_rows(),
            combined.num_columns(),
            Some(start.elapsed()),
        );
        Ok(combined)
    }

    /// Load every available year
    pub fn load_all(&self, options: &LoadOptions, parallel: bool) -> Result<RecordBatch> {
        self.load_years(&self.available_years, options, parallel)
    }

    /// Iterate over a year in chunks of `chunk_size` rows
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a chunk size of zero
    pub fn iter_year_chunks(
        &self,
        year: i32,
        chunk_size: Option<usize>,
        columns: Option<&[String]>,
        dtypes: Option<&DtypeHints>,
    ) -> Result<YearChunks> {
        let chunk_size = chunk_size.unwrap_or(self.config.chunk_size);
        if chunk_size == 0 {
            return Err(YearlyDataError::invalid_argument("chunk size must be positive"));
        }

        let path = self.year_path(year)?;
        log_operation_start(&format!("Reading {year} in chunks of {chunk_size} rows"), &path);
        let reader = CsvYearReader::open(&path, &self.config, columns, dtypes, None)?
            .with_batch_size(chunk_size);
        YearChunks::new(year, reader)
    }

    /// Column names of a year file, or of the latest year when `year` is `None`
    ///
    /// Only the header line is read.
    pub fn get_column_names(&self, year: Option<i32>) -> Result<Vec<String>> {
        let year = match year {
            Some(year) => year,
            None => self.latest_year()?,
        };
        read_header(&self.year_path(year)?, self.config.delimiter)
    }

    /// A reproducible random sample of `n` rows from a year
    ///
    /// Years with at most `n` rows are returned whole.
    pub fn sample_year(
        &self,
        year: i32,
        n: usize,
        columns: Option<&[String]>,
    ) -> Result<RecordBatch> {
        let path = self.year_path(year)?;
        log_operation_start(&format!("Sampling {n} rows of {year}"), &path);
        let options = LoadOptions {
            columns: columns.map(<[String]>::to_vec),
            ..LoadOptions::default()
        };
        let table = read_year_file(year, &path, &self.config, &options, None)?;
        let sample = sample_rows(&table, n, self.config.sample_seed)?;
        log_table_loaded(
            &format!("sample of {year}"),
            sample.num_rows(),
            sample.num_columns(),
            None,
        );
        Ok(sample)
    }

    /// File metadata for a year without loading it
    pub fn get_year_info(&self, year: i32) -> Result<YearInfo> {
        let path = self.year_path(year)?;
        let size_mb = file_size_mb(&path)?;
        let estimated_rows = count_lines(&path)?.saturating_sub(1);
        let column_count = self.get_column_names(Some(year))?.len();

        Ok(YearInfo {
            year,
            path,
            size_mb,
            estimated_rows,
            column_count,
        })
    }

    fn latest_year(&self) -> Result<i32> {
        self.available_years
            .last()
            .copied()
            .ok_or_else(|| YearlyDataError::NoYearsAvailable(self.config.data_dir.clone()))
    }
}

impl fmt::Display for YearlyDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "YearlyDataset(data_dir='{}', available_years=[{}])",
            self.config.data_dir.display(),
            self.available_years.iter().join(", ")
        )
    }
}

/// Read one year file, applying projection, dtype hints, row cap and filter
pub(crate) fn read_year_file(
    year: i32,
    path: &Path,
    config: &LoaderConfig,
    options: &LoadOptions,
    row_cap: Option<usize>,
) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start(&format!("Loading {year}"), path);

    let reader = CsvYearReader::open(
        path,
        config,
        options.columns.as_deref(),
        options.dtypes.as_ref(),
        row_cap,
    )?;

    if let Some(filter) = &options.filter {
        check_filter_columns(filter.as_ref(), &reader.schema(), path)?;
    }
    let mut table = reader.read_all(row_cap)?;

    if let Some(filter) = &options.filter {
        let before = table.num_rows();
        table = filter.filter(&table)?;
        log::debug!("Filter kept {} of {before} rows for {year}", table.num_rows());
    }

    log_table_loaded(
        &year.to_string(),
        table.num_rows(),
        table.num_columns(),
        Some(start.elapsed()),
    );
    Ok(table)
}

/// Fail before reading when a filter needs a column the table will not have
fn check_filter_columns(filter: &dyn BatchFilter, schema: &Schema, path: &Path) -> Result<()> {
    let missing = filter
        .required_columns()
        .into_iter()
        .filter(|column| schema.index_of(column).is_err())
        .sorted()
        .collect::<Vec<_>>();

    if missing.is_empty() {
        return Ok(());
    }
    Err(YearlyDataError::filter_error(format!(
        "Filter needs column(s) [{}] which are not loaded from {}",
        missing.join(", "),
        path.display()
    )))
}
