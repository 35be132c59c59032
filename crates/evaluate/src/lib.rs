//! Hazard backtesting: compare flood predictions against historical
//! disaster records.
//!
//! For every boundary region and every day of the configured range the
//! [`Backtester`] builds one [`EvaluationCell`]: the hazard value from the
//! index engine and whether the linked disaster-database region reported a
//! qualifying event that day. Cells are reduced into a [`ConfusionMatrix`].
//!
//! Regions without a link and cells without hazard data never enter the
//! matrix. They are counted in [`Exclusions`] so the reported accuracy is
//! not inflated by missing ground truth.
//!
//! Regions are evaluated in parallel with rayon; per-region matrices are
//! merged, and merging is order independent.

mod backtest;
mod config;
mod confusion;
mod error;
mod output;

pub use backtest::{Backtester, EvaluationCell};
pub use config::{BacktestConfig, RegionFilter};
pub use confusion::{ConfusionMatrix, Metrics};
pub use error::EvaluateError;
pub use output::{BacktestReport, ConfigSummary, Exclusions, SweepReport, SweepRow, to_json};
