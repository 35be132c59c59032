//! Accumulated validation utilities.
//!
//! [`ValidationCollector`] gathers every problem found in an input file into
//! a single [`IoError::Validation`], so a bad file reports all of its faults
//! at once.

use arrow::datatypes::{DataType, Schema};

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` if nothing was recorded, otherwise one
    /// [`IoError::Validation`] joining every message with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Sample table schema
// ---------------------------------------------------------------------------

/// Column names and types of a hazard sample table, in file order.
pub(crate) const SAMPLE_COLUMNS: [(&str, DataType); 3] = [
    ("region_id", DataType::Utf8),
    ("date", DataType::Date32),
    ("value", DataType::Float64),
];

/// Checks that `schema` carries every sample column with the right type.
///
/// Columns are looked up by name; extra columns are ignored.
pub(crate) fn validate_sample_schema(schema: &Schema) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (name, expected) in &SAMPLE_COLUMNS {
        match schema.field_with_name(name) {
            Ok(field) if field.data_type() == expected => {}
            Ok(field) => c.push(format!(
                "column '{name}': expected {expected}, got {}",
                field.data_type()
            )),
            Err(_) => c.push(format!("missing column '{name}'")),
        }
    }
    c
}
