//! Expression-based filtering
//!
//! An [`Expr`] is plain data, so it can be built once and handed to every worker
//! of a parallel load. Literals are cast to the column's type and compared with
//! Arrow's comparison kernels. Comparisons against null never select a row.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, Scalar, StringArray,
};
use arrow::compute::kernels::cmp::{eq, gt, gt_eq, lt, lt_eq, neq};
use arrow::compute::{and_kleene, cast, is_not_null, is_null, not, or_kleene};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Result, YearlyDataError};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::utils::arrow::common_type;

/// Represents a filter expression over the columns of a year table
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than a literal value
    Gt(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than a literal value
    Lt(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Column is null
    IsNull(String),

    /// Column is not null
    IsNotNull(String),

    /// Column value contains a substring
    Contains(String, String),

    /// Column value starts with a prefix
    StartsWith(String, String),

    /// Column value ends with a suffix
    EndsWith(String, String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Boolean value
    Boolean(bool),

    /// Integer value
    Int(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Null value
    Null,
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for LiteralValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for LiteralValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl LiteralValue {
    /// One-element array holding this literal, or `None` for `Null`
    fn to_array(&self) -> Option<ArrayRef> {
        let array: ArrayRef = match self {
            Self::Boolean(v) => Arc::new(BooleanArray::from(vec![*v])),
            Self::Int(v) => Arc::new(Int64Array::from(vec![*v])),
            Self::Float(v) => Arc::new(Float64Array::from(vec![*v])),
            Self::String(v) => Arc::new(StringArray::from(vec![v.as_str()])),
            Self::Null => return None,
        };
        Some(array)
    }
}

impl Expr {
    /// Combine with another expression using AND
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        match self {
            Self::And(mut exprs) => {
                exprs.push(rhs);
                Self::And(exprs)
            }
            lhs => Self::And(vec![lhs, rhs]),
        }
    }

    /// Combine with another expression using OR
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        match self {
            Self::Or(mut exprs) => {
                exprs.push(rhs);
                Self::Or(exprs)
            }
            lhs => Self::Or(vec![lhs, rhs]),
        }
    }

    /// Negate this expression
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _)
            | Self::NotEq(col, _)
            | Self::Gt(col, _)
            | Self::GtEq(col, _)
            | Self::Lt(col, _)
            | Self::LtEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _)
            | Self::IsNull(col)
            | Self::IsNotNull(col)
            | Self::Contains(col, _)
            | Self::StartsWith(col, _)
            | Self::EndsWith(col, _) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }
}

/// Start building an expression on a column
#[must_use]
pub fn col(name: &str) -> ColumnBuilder {
    ColumnBuilder {
        name: name.to_string(),
    }
}

/// Builder returned by [`col`]
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    name: String,
}

impl ColumnBuilder {
    /// Column equals `val`
    pub fn eq(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::Eq(self.name, val.into())
    }

    /// Column differs from `val`
    pub fn not_eq(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::NotEq(self.name, val.into())
    }

    /// Column is greater than `val`
    pub fn gt(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::Gt(self.name, val.into())
    }

    /// Column is greater than or equal to `val`
    pub fn gt_eq(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::GtEq(self.name, val.into())
    }

    /// Column is less than `val`
    pub fn lt(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::Lt(self.name, val.into())
    }

    /// Column is less than or equal to `val`
    pub fn lt_eq(self, val: impl Into<LiteralValue>) -> Expr {
        Expr::LtEq(self.name, val.into())
    }

    /// Column is one of `values`
    pub fn in_list<V: Into<LiteralValue>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::In(self.name, values.into_iter().map(Into::into).collect())
    }

    /// Column is none of `values`
    pub fn not_in_list<V: Into<LiteralValue>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::NotIn(self.name, values.into_iter().map(Into::into).collect())
    }

    /// Column is null
    #[must_use]
    pub fn is_null(self) -> Expr {
        Expr::IsNull(self.name)
    }

    /// Column is not null
    #[must_use]
    pub fn is_not_null(self) -> Expr {
        Expr::IsNotNull(self.name)
    }

    /// Column contains `val`
    #[must_use]
    pub fn contains(self, val: &str) -> Expr {
        Expr::Contains(self.name, val.into())
    }

    /// Column starts with `val`
    #[must_use]
    pub fn starts_with(self, val: &str) -> Expr {
        Expr::StartsWith(self.name, val.into())
    }

    /// Column ends with `val`
    #[must_use]
    pub fn ends_with(self, val: &str) -> Expr {
        Expr::EndsWith(self.name, val.into())
    }
}

#[derive(Clone, Copy)]
enum CmpOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

/// Evaluates a filter expression against a record batch
///
/// # Returns
/// A boolean array indicating which rows match the filter
///
/// # Errors
/// Returns an error if a referenced column is missing or a kernel fails
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),
        Expr::AlwaysFalse => Ok(BooleanArray::from(vec![false; batch.num_rows()])),
        Expr::And(exprs) => {
            let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                result = and_kleene(&result, &evaluate_expr(batch, expr)?)?;
            }
            Ok(result)
        }
        Expr::Or(exprs) => {
            let mut result = BooleanArray::from(vec![false; batch.num_rows()]);
            for expr in exprs {
                result = or_kleene(&result, &evaluate_expr(batch, expr)?)?;
            }
            Ok(result)
        }
        Expr::Not(inner) => Ok(not(&evaluate_expr(batch, inner)?)?),
        Expr::Eq(column, value) => compare(batch, column, value, CmpOp::Eq),
        Expr::NotEq(column, value) => compare(batch, column, value, CmpOp::NotEq),
        Expr::Gt(column, value) => compare(batch, column, value, CmpOp::Gt),
        Expr::GtEq(column, value) => compare(batch, column, value, CmpOp::GtEq),
        Expr::Lt(column, value) => compare(batch, column, value, CmpOp::Lt),
        Expr::LtEq(column, value) => compare(batch, column, value, CmpOp::LtEq),
        Expr::In(column, values) => {
            let mut result = BooleanArray::from(vec![false; batch.num_rows()]);
            for value in values {
                result = or_kleene(&result, &compare(batch, column, value, CmpOp::Eq)?)?;
            }
            Ok(result)
        }
        Expr::NotIn(column, values) => {
            let is_in = evaluate_expr(batch, &Expr::In(column.clone(), values.clone()))?;
            Ok(not(&is_in)?)
        }
        Expr::IsNull(column) => Ok(is_null(get_column(batch, column)?.as_ref())?),
        Expr::IsNotNull(column) => Ok(is_not_null(get_column(batch, column)?.as_ref())?),
        Expr::Contains(column, needle) => {
            string_predicate(batch, column, |s| s.contains(needle.as_str()))
        }
        Expr::StartsWith(column, prefix) => {
            string_predicate(batch, column, |s| s.starts_with(prefix.as_str()))
        }
        Expr::EndsWith(column, suffix) => {
            string_predicate(batch, column, |s| s.ends_with(suffix.as_str()))
        }
    }
}

fn get_column<'a>(batch: &'a RecordBatch, column: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(column)
        .ok_or_else(|| YearlyDataError::filter_error(format!("Column {column} not found in batch")))
}

fn compare(batch: &RecordBatch, column: &str, value: &LiteralValue, op: CmpOp) -> Result<BooleanArray> {
    let array = get_column(batch, column)?;
    let Some(literal) = value.to_array() else {
        return Ok(BooleanArray::new_null(batch.num_rows()));
    };
    if array.data_type() == &DataType::Null {
        return Ok(BooleanArray::new_null(batch.num_rows()));
    }

    // Numbers compare in their common type so 2.5 against an integer column is not truncated
    let target = if array.data_type().is_numeric() && literal.data_type().is_numeric() {
        common_type(array.data_type(), literal.data_type())
    } else {
        array.data_type().clone()
    };

    let lhs = if array.data_type() == &target {
        array.clone()
    } else {
        cast(array.as_ref(), &target)?
    };
    let rhs = Scalar::new(cast(literal.as_ref(), &target)?);

    let result = match op {
        CmpOp::Eq => eq(&lhs, &rhs),
        CmpOp::NotEq => neq(&lhs, &rhs),
        CmpOp::Gt => gt(&lhs, &rhs),
        CmpOp::GtEq => gt_eq(&lhs, &rhs),
        CmpOp::Lt => lt(&lhs, &rhs),
        CmpOp::LtEq => lt_eq(&lhs, &rhs),
    }?;
    Ok(result)
}

fn string_predicate(
    batch: &RecordBatch,
    column: &str,
    predicate: impl Fn(&str) -> bool,
) -> Result<BooleanArray> {
    let array = get_column(batch, column)?;
    let strings = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast(array.as_ref(), &DataType::Utf8)?
    };
    let strings = strings
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| YearlyDataError::filter_error(format!("Column {column} is not a string array")))?;

    Ok(strings.iter().map(|s| s.map(&predicate)).collect())
}

/// A filter that evaluates an [`Expr`]
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    /// Create a new expression filter
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// The wrapped expression
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl From<Expr> for ExpressionFilter {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = evaluate_expr(batch, &self.expr)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.expr.required_columns()
    }
}
