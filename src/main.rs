use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use log::{info, warn};
use yearly_csv::{LoadOptions, YearlyDataset};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = std::env::args_os().nth(1).map(PathBuf::from);
    let dataset = YearlyDataset::new(data_dir.as_deref())
        .context("Failed to open the yearly data directory")?;
    info!("{dataset}");

    let Some(&latest) = dataset.available_years().last() else {
        warn!("No year files found in {}", dataset.data_dir().display());
        return Ok(());
    };

    let columns = dataset.get_column_names(Some(latest))?;
    info!(
        "Columns of {latest} ({} total), first ten: {:?}",
        columns.len(),
        columns.iter().take(10).collect::<Vec<_>>()
    );

    let start = Instant::now();
    let head = dataset.load_year(latest, &LoadOptions::new().with_row_cap(5))?;
    info!(
        "Loaded first {} rows of {latest} in {:?}",
        head.num_rows(),
        start.elapsed()
    );

    let sample = dataset.sample_year(latest, 100, None)?;
    info!("Sampled {} rows from {latest}", sample.num_rows());

    let year_info = dataset.get_year_info(latest)?;
    info!("Year info:\n{}", serde_json::to_string_pretty(&year_info)?);

    Ok(())
}
