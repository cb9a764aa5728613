//! Deterministic row sampling.

use arrow::array::UInt64Array;
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;

/// Pick `n` distinct random rows from `batch`
///
/// Tables with at most `n` rows are returned unchanged. The same `seed` always
/// selects the same rows.
pub fn sample_rows(batch: &RecordBatch, n: usize, seed: u64) -> Result<RecordBatch> {
    if batch.num_rows() <= n {
        return Ok(batch.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let picked = rand::seq::index::sample(&mut rng, batch.num_rows(), n);
    let indices = UInt64Array::from_iter_values(picked.iter().map(|i| i as u64));

    Ok(take_record_batch(batch, &indices)?)
}
