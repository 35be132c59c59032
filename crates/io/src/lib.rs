//! # hmhews-io
//!
//! File formats at the edge of the backtest: hazard sample tables in
//! Parquet, region lists and DIBI exports in JSON, manual override tables in
//! TOML, and JSON report output. Everything here converts to and from the
//! in-memory types of the other workspace crates.

mod error;
mod json;
mod overrides;
mod parquet_read;
mod parquet_write;
mod validate;
mod writer;

pub use error::IoError;
pub use json::{RegionRecord, read_dibi_export, read_hierarchy, write_json};
pub use overrides::{read_overrides, write_overrides};
pub use parquet_read::read_sample_table;
pub use writer::{Compression, WriterConfig, write_sample_table};
