//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{Date32Type, Float64Type};
use hmhews_sources::SampleTable;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_write::days_to_date;
use crate::validate::{ValidationCollector, validate_sample_schema};

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

/// Appends the rows of `batches` to a [`SampleTable`].
///
/// Null cells and out-of-range dates are collected and reported together;
/// any such row fails the whole read.
pub(crate) fn batches_to_table(batches: &[RecordBatch]) -> Result<SampleTable, IoError> {
    let mut table = SampleTable::new();
    let mut problems = ValidationCollector::new();
    let mut offset = 0usize;

    for batch in batches {
        let schema = batch.schema();
        validate_sample_schema(&schema).finish()?;

        let regions = batch.column(schema.index_of("region_id")?).as_string::<i32>();
        let dates = batch.column(schema.index_of("date")?).as_primitive::<Date32Type>();
        let values = batch.column(schema.index_of("value")?).as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let at = offset + row;
            if regions.is_null(row) || dates.is_null(row) || values.is_null(row) {
                problems.push(format!("row {at}: null cell"));
                continue;
            }
            let Some(date) = days_to_date(dates.value(row)) else {
                problems.push(format!("row {at}: date out of range ({})", dates.value(row)));
                continue;
            };
            table.push(regions.value(row), date, values.value(row));
        }
        offset += batch.num_rows();
    }

    problems.finish()?;
    Ok(table)
}

/// Reads a hazard sample table from Parquet.
///
/// The file needs `region_id` (Utf8), `date` (Date32) and `value` (Float64)
/// columns; other columns are ignored. Values are loaded as stored; sentinel
/// handling belongs to the source adapter.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Parquet`], or
/// [`IoError::Validation`] for a wrong schema or null cells.
pub fn read_sample_table(path: &Path) -> Result<SampleTable, IoError> {
    let batches = read_batches(path)?;
    debug!(path = %path.display(), batches = batches.len(), "parquet batches read");
    let table = batches_to_table(&batches)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        regions = table.regions().count(),
        "sample table loaded"
    );
    Ok(table)
}
