//! Arrow table helpers
//!
//! Helpers for combining per-year tables and drawing samples from them.

pub mod concat;
pub mod sample;

// Re-export commonly used functions for convenience
pub use concat::{align_to_schema, common_type, concat_tables, unify_schemas};
pub use sample::sample_rows;
