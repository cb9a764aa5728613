//! One-call loading for scripts and the demo binary.

use std::path::Path;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;

use super::{LoadOptions, YearlyDataset};
use crate::error::{Result, YearlyDataError};
use crate::filter::SharedFilter;

/// Which years to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSpec {
    /// Every available year
    All,
    /// A single year
    One(i32),
    /// Several years, loaded in the given order
    Many(Vec<i32>),
}

impl From<i32> for YearSpec {
    fn from(year: i32) -> Self {
        Self::One(year)
    }
}

impl From<Vec<i32>> for YearSpec {
    fn from(years: Vec<i32>) -> Self {
        Self::Many(years)
    }
}

impl From<&[i32]> for YearSpec {
    fn from(years: &[i32]) -> Self {
        Self::Many(years.to_vec())
    }
}

impl TryFrom<&str> for YearSpec {
    type Error = YearlyDataError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for YearSpec {
    type Err = YearlyDataError;

    /// Parses `all`, a single year such as `2020`, or a list such as `2020,2021`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let invalid = || YearlyDataError::invalid_argument(format!("unsupported year specification '{s}'"));
        if s.contains(',') {
            let years = s
                .split(',')
                .map(|part| part.trim().parse::<i32>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::Many(years));
        }

        s.parse::<i32>().map(Self::One).map_err(|_| invalid())
    }
}

/// Load years from a data directory in one call
///
/// `All` loads every available year and `Many` the listed years, both on the
/// worker pool. `One` is a plain single-year load. Textual specs such as
/// `"all"` or `"2020,2021"` are parsed into a [`YearSpec`] first.
///
/// # Examples
/// ```no_run
/// use yearly_csv::{YearSpec, quick_load};
///
/// let table = quick_load(YearSpec::One(2020), Some(&["AGE".to_string()]), None, None)?;
/// println!("{} rows", table.num_rows());
///
/// let spec = YearSpec::try_from("all")?;
/// let everything = quick_load(spec, None, None, None)?;
/// println!("{} rows", everything.num_rows());
/// # Ok::<(), yearly_csv::YearlyDataError>(())
/// ```
pub fn quick_load(
    years: impl Into<YearSpec>,
    columns: Option<&[String]>,
    filter: Option<SharedFilter>,
    data_dir: Option<&Path>,
) -> Result<RecordBatch> {
    let dataset = YearlyDataset::new(data_dir)?;
    let options = LoadOptions {
        columns: columns.map(<[String]>::to_vec),
        filter,
        ..LoadOptions::default()
    };

    match years.into() {
        YearSpec::All => dataset.load_all(&options, true),
        YearSpec::One(year) => dataset.load_year(year, &options),
        YearSpec::Many(years) => dataset.load_years(&years, &options, true),
    }
}
