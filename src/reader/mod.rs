//! Module for reading yearly CSV files into Arrow record batches.
//!
//! The Arrow CSV reader does the parsing. This module decides the schema it
//! parses with: inferred types, overridden by per-column dtype hints, narrowed
//! by an optional column projection.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::csv::reader::{Format, Reader, ReaderBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::config::LoaderConfig;
use crate::error::{Result, YearlyDataError};
use crate::utils::{concat_tables, log_warning, open_file};

/// Per-column type coercion applied while parsing
pub type DtypeHints = HashMap<String, DataType>;

/// Map a textual dtype hint to an Arrow type
///
/// # Errors
/// Returns `InvalidArgument` for unknown type names
pub fn parse_dtype(name: &str) -> Result<DataType> {
    let data_type = match name.trim().to_ascii_lowercase().as_str() {
        "str" | "string" | "utf8" | "object" => DataType::Utf8,
        "int" | "int64" | "i64" => DataType::Int64,
        "int32" | "i32" => DataType::Int32,
        "float" | "float64" | "f64" => DataType::Float64,
        "float32" | "f32" => DataType::Float32,
        "bool" | "boolean" => DataType::Boolean,
        "date" | "date32" => DataType::Date32,
        other => {
            return Err(YearlyDataError::invalid_argument(format!(
                "unknown dtype '{other}'"
            )));
        }
    };
    Ok(data_type)
}

/// Build a dtype hint map from `(column, type name)` pairs
pub fn dtype_hints<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<DtypeHints> {
    pairs
        .into_iter()
        .map(|(column, name)| Ok((column.to_string(), parse_dtype(name)?)))
        .collect()
}

/// CSV format shared by every read of a year file
#[must_use]
pub fn csv_format(delimiter: u8) -> Format {
    let format = Format::default().with_header(true);
    if delimiter == b',' {
        format
    } else {
        format.with_delimiter(delimiter)
    }
}

/// Read only the header of a CSV file and return its column names
pub fn read_header(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let file = open_file(path)?;
    let (schema, _) = csv_format(delimiter)
        .infer_schema(BufReader::new(file), Some(0))
        .map_err(|e| YearlyDataError::parse(path, e))?;

    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Replace inferred column types with the hinted ones
///
/// Hints naming columns that are not in the file are ignored with a warning.
#[must_use]
pub fn apply_dtype_hints(schema: &Schema, hints: &DtypeHints, path: &Path) -> Schema {
    for column in hints.keys() {
        if schema.index_of(column).is_err() {
            log_warning(
                &format!("Dtype hint for unknown column '{column}' ignored"),
                Some(path),
            );
        }
    }

    let fields = schema
        .fields()
        .iter()
        .map(|field| match hints.get(field.name()) {
            Some(data_type) => Field::new(field.name(), data_type.clone(), true),
            None => field.as_ref().clone(),
        })
        .collect::<Vec<_>>();

    Schema::new(fields)
}

/// Resolve a column projection to schema indices in file order
///
/// # Errors
/// Returns `ColumnNotFound` for a column missing from the file and
/// `InvalidArgument` for an empty projection
pub fn resolve_projection(schema: &Schema, columns: &[String], path: &Path) -> Result<Vec<usize>> {
    if columns.is_empty() {
        return Err(YearlyDataError::invalid_argument(
            "column projection must name at least one column",
        ));
    }

    let mut indices = columns
        .iter()
        .map(|column| {
            schema
                .index_of(column)
                .map_err(|_| YearlyDataError::ColumnNotFound {
                    column: column.clone(),
                    path: path.to_path_buf(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

/// A prepared read of one year file
///
/// Holds the schema the file will be parsed with and the projection to apply.
/// Nothing is parsed until [`CsvYearReader::read_all`] or
/// [`CsvYearReader::into_batches`] is called.
#[derive(Debug, Clone)]
pub struct CsvYearReader {
    path: PathBuf,
    delimiter: u8,
    batch_size: usize,
    file_schema: SchemaRef,
    projection: Option<Vec<usize>>,
    output_schema: SchemaRef,
}

impl CsvYearReader {
    /// Infer the schema of `path` and prepare a read
    ///
    /// # Arguments
    /// * `path` - The CSV file
    /// * `config` - Loader configuration (delimiter, batch size, inference depth)
    /// * `columns` - Optional column projection
    /// * `dtypes` - Optional dtype hints
    /// * `row_cap` - Optional row cap; also bounds type inference
    pub fn open(
        path: &Path,
        config: &LoaderConfig,
        columns: Option<&[String]>,
        dtypes: Option<&DtypeHints>,
        row_cap: Option<usize>,
    ) -> Result<Self> {
        let inference_rows = match (config.schema_inference_rows, row_cap) {
            (Some(limit), Some(cap)) => Some(limit.min(cap)),
            (limit, cap) => limit.or(cap),
        };

        let file = open_file(path)?;
        let (inferred, records) = csv_format(config.delimiter)
            .infer_schema(BufReader::new(file), inference_rows)
            .map_err(|e| YearlyDataError::parse(path, e))?;
        log::debug!(
            "Inferred {} columns from {} records of {}",
            inferred.fields().len(),
            records,
            path.display()
        );

        let file_schema = match dtypes {
            Some(hints) if !hints.is_empty() => apply_dtype_hints(&inferred, hints, path),
            _ => inferred,
        };

        let projection = columns
            .map(|cols| resolve_projection(&file_schema, cols, path))
            .transpose()?;

        let output_schema = match &projection {
            Some(indices) => Arc::new(file_schema.project(indices)?),
            None => Arc::new(file_schema.clone()),
        };

        let batch_size = match row_cap {
            Some(cap) => config.batch_size.min(cap.max(1)),
            None => config.batch_size,
        };

        Ok(Self {
            path: path.to_path_buf(),
            delimiter: config.delimiter,
            batch_size,
            file_schema: Arc::new(file_schema),
            projection,
            output_schema,
        })
    }

    /// Use a different number of rows per record batch (at least one)
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Schema of the batches this reader produces
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.output_schema)
    }

    /// Path of the file being read
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and return a streaming batch reader
    pub fn into_batches(self) -> Result<Reader<File>> {
        let file = open_file(&self.path)?;
        let mut builder = ReaderBuilder::new(Arc::clone(&self.file_schema))
            .with_format(csv_format(self.delimiter))
            .with_batch_size(self.batch_size);
        if let Some(indices) = self.projection {
            builder = builder.with_projection(indices);
        }

        builder
            .build(file)
            .map_err(|e| YearlyDataError::parse(&self.path, e))
    }

    /// Read the whole file (or its first `row_cap` rows) into one table
    pub fn read_all(self, row_cap: Option<usize>) -> Result<RecordBatch> {
        let path = self.path.clone();
        let schema = self.schema();
        let mut remaining = row_cap;
        let mut batches = Vec::new();

        for batch in self.into_batches()? {
            if remaining == Some(0) {
                break;
            }
            let batch = batch.map_err(|e| YearlyDataError::parse(&path, e))?;
            match remaining.as_mut() {
                Some(left) if batch.num_rows() >= *left => {
                    batches.push(batch.slice(0, *left));
                    *left = 0;
                }
                Some(left) => {
                    *left -= batch.num_rows();
                    batches.push(batch);
                }
                None => batches.push(batch),
            }
        }

        if batches.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }
        concat_tables(&batches)
    }
}
