//! A Rust library for loading a directory of yearly CSV files
//! (`cleaned_<year>_all.csv`) as Arrow tables, with column projection,
//! row filters, chunked iteration, sampling and parallel multi-year loads.

pub mod async_io;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod reader;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::LoaderConfig;
pub use dataset::{LoadOptions, YearChunks, YearInfo, YearSpec, YearlyDataset, quick_load};
pub use error::{Result, YearlyDataError};
pub use reader::{DtypeHints, dtype_hints, parse_dtype};

// Arrow types
pub use arrow::datatypes::DataType;
pub use arrow::record_batch::RecordBatch;

// Filtering capabilities
pub use filter::{BatchFilter, Expr, ExpressionFilter, FnFilter, LiteralValue, SharedFilter, col};

// Async functionality
pub use async_io::load_years_async;
