//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{Field, Schema};
use chrono::{Datelike, NaiveDate};
use hmhews_sources::SampleTable;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;
use crate::validate::SAMPLE_COLUMNS;

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the Date32 epoch.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, as stored in a Date32 column.
pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

/// Inverse of [`date_to_days`]; `None` outside chrono's range.
pub(crate) fn days_to_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Arrow schema of a hazard sample table: `region_id`, `date`, `value`.
pub(crate) fn build_schema() -> Schema {
    Schema::new(
        SAMPLE_COLUMNS
            .iter()
            .map(|(name, dt)| Field::new(*name, dt.clone(), false))
            .collect::<Vec<_>>(),
    )
}

/// Converts every row of `table` into one [`RecordBatch`].
pub(crate) fn table_to_record_batch(
    table: &SampleTable,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let n = table.len();
    let mut regions = Vec::with_capacity(n);
    let mut dates = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for (region, date, value) in table.rows() {
        regions.push(region);
        dates.push(date_to_days(date));
        values.push(value);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(regions)),
        Arc::new(Date32Array::from(dates)),
        Arc::new(Float64Array::from(values)),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(date_to_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_days(ymd(1969, 12, 31)), -1);
        assert_eq!(date_to_days(ymd(2022, 12, 1)), 19327);
        assert_eq!(days_to_date(19327), Some(ymd(2022, 12, 1)));
        assert_eq!(days_to_date(i32::MAX), None);
    }

    #[test]
    fn schema_has_sample_columns() {
        let schema = build_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["region_id", "date", "value"]);
    }

    #[test]
    fn record_batch_holds_every_row() {
        let table: SampleTable = [
            ("IDN.1.1_1", ymd(2022, 12, 1), 12.5),
            ("IDN.1.1_1", ymd(2022, 12, 1), 3.0),
            ("IDN.1.2_1", ymd(2022, 12, 2), 0.0),
        ]
        .into_iter()
        .collect();
        let schema = build_schema();
        let batch = table_to_record_batch(&table, &schema).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 3);
    }
}
