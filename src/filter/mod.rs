//! Row filtering for loaded year tables
//!
//! Filters are applied after a year has been read and before its table is
//! returned. Two flavours exist: [`FnFilter`] wraps a named function and
//! [`ExpressionFilter`] evaluates an [`Expr`] built with [`col`].
//!
//! ```
//! use yearly_csv::filter::{ExpressionFilter, col};
//!
//! let filter = ExpressionFilter::new(col("STATE").eq("CA").and(col("AGE").gt_eq(18)));
//! assert_eq!(filter.expr().required_columns().len(), 2);
//! ```

pub mod core;
pub mod expr;

pub use self::core::{
    AndFilter, BatchFilter, FilterFn, FnFilter, IncludeAllFilter, SharedFilter,
    filter_record_batch,
};
pub use self::expr::{ColumnBuilder, Expr, ExpressionFilter, LiteralValue, col, evaluate_expr};
