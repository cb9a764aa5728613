//! Concatenation of tables from different years.
//!
//! Years are read independently, so their inferred schemas can drift (a column
//! added in a later year, integers in one year and decimals in the next). The
//! tables are aligned to a unified schema before being concatenated.

use std::sync::Arc;

use arrow::array::{ArrayRef, new_null_array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::Result;

/// Concatenate tables into a single table with contiguous rows
///
/// Tables sharing one schema are concatenated as-is. Otherwise the result has
/// the union of all columns (first-seen order), missing columns are filled
/// with nulls and conflicting types are widened with [`common_type`].
///
/// An empty slice yields an empty table without columns.
pub fn concat_tables(tables: &[RecordBatch]) -> Result<RecordBatch> {
    let Some(first) = tables.first() else {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    };

    let schema = first.schema();
    if tables.iter().all(|t| t.schema() == schema) {
        return Ok(concat_batches(&schema, tables)?);
    }

    let unified = unify_schemas(tables.iter().map(RecordBatch::schema));
    log::debug!(
        "Unifying {} tables to a schema with {} columns",
        tables.len(),
        unified.fields().len()
    );

    let aligned = tables
        .iter()
        .map(|t| align_to_schema(t, &unified))
        .collect::<Result<Vec<_>>>()?;

    Ok(concat_batches(&unified, &aligned)?)
}

/// Build the union schema of several tables
#[must_use]
pub fn unify_schemas(schemas: impl IntoIterator<Item = SchemaRef>) -> SchemaRef {
    let mut fields: Vec<(String, DataType)> = Vec::new();

    for schema in schemas {
        for field in schema.fields() {
            match fields.iter_mut().find(|(name, _)| name == field.name()) {
                Some((_, data_type)) => *data_type = common_type(data_type, field.data_type()),
                None => fields.push((field.name().clone(), field.data_type().clone())),
            }
        }
    }

    Arc::new(Schema::new(
        fields
            .into_iter()
            .map(|(name, data_type)| Field::new(name, data_type, true))
            .collect::<Vec<_>>(),
    ))
}

/// Type able to hold values of both `a` and `b`
#[must_use]
pub fn common_type(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        _ if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        _ if a.is_integer() && b.is_integer() => DataType::Int64,
        _ if a.is_numeric() && b.is_numeric() => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Reshape a table to `schema`, casting or null-filling columns as needed
pub fn align_to_schema(table: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = schema
        .fields()
        .iter()
        .map(|field| match table.column_by_name(field.name()) {
            Some(column) if column.data_type() == field.data_type() => Ok(Arc::clone(column)),
            Some(column) => Ok(cast(column, field.data_type())?),
            None => Ok(new_null_array(field.data_type(), table.num_rows())),
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    Ok(RecordBatch::try_new(Arc::clone(schema), columns)?)
}
