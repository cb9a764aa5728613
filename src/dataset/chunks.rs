//! Chunked iteration over a single year file.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use arrow::csv::reader::Reader;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::{Result, YearlyDataError};
use crate::reader::CsvYearReader;
use crate::utils::log_table_loaded;

/// Sequential fixed-size chunks of one year file
///
/// Every chunk holds the requested number of rows except possibly the last.
/// The file stays open until the iterator is exhausted or dropped. After the
/// first error the iterator is fused.
pub struct YearChunks {
    year: i32,
    path: PathBuf,
    schema: SchemaRef,
    reader: Option<Reader<File>>,
    chunks_read: usize,
    rows_read: usize,
}

impl YearChunks {
    pub(crate) fn new(year: i32, reader: CsvYearReader) -> Result<Self> {
        let path = reader.path().to_path_buf();
        let schema = reader.schema();
        let reader = reader.into_batches()?;
        Ok(Self {
            year,
            path,
            schema,
            reader: Some(reader),
            chunks_read: 0,
            rows_read: 0,
        })
    }

    /// Schema shared by every chunk
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }
}

impl Iterator for YearChunks {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match reader.next() {
            Some(Ok(batch)) => {
                self.chunks_read += 1;
                self.rows_read += batch.num_rows();
                log::debug!("Chunk {} of {}: {} rows", self.chunks_read, self.year, batch.num_rows());
                Some(Ok(batch))
            }
            Some(Err(e)) => {
                self.reader = None;
                Some(Err(YearlyDataError::parse(&self.path, e)))
            }
            None => {
                log_table_loaded(
                    &format!("{} in {} chunks", self.year, self.chunks_read),
                    self.rows_read,
                    self.schema.fields().len(),
                    None,
                );
                self.reader = None;
                None
            }
        }
    }
}

impl fmt::Debug for YearChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YearChunks")
            .field("year", &self.year)
            .field("path", &self.path)
            .field("chunks_read", &self.chunks_read)
            .field("finished", &self.reader.is_none())
            .finish()
    }
}
