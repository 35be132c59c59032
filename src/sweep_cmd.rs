//! Sweep command: score the hazard index over a list of thresholds.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hmhews_evaluate::Backtester;
use hmhews_index::Threshold;

use crate::cli::SweepArgs;
use crate::config::HmhewsConfig;
use crate::{convert, pipeline};

/// Tenths of the scale, `0.1 * scale ..= scale`.
fn default_thresholds(scale: f64) -> Vec<f64> {
    (1..=10).map(|i| f64::from(i) * scale / 10.0).collect()
}

pub fn run(args: SweepArgs) -> Result<()> {
    let _cmd = info_span!("sweep").entered();
    let config = HmhewsConfig::load(&args.config)?;

    let values = if args.thresholds.is_empty() {
        default_thresholds(config.backtest.threshold_scale)
    } else {
        args.thresholds
    };
    let thresholds = values
        .iter()
        .map(|&v| convert::build_threshold(&config.backtest, Some(v)))
        .collect::<Result<Vec<Threshold>>>()?;
    let first = *thresholds.first().context("no thresholds to sweep")?;
    let bt_config = convert::build_backtest_config(&config, first)?;

    let rows = pipeline::read_export(&config)?;
    let identities = pipeline::resolve_identities(&config, &rows)?;
    let regions = identities.evaluated_regions(&config)?;
    let store = pipeline::build_store(&config, &rows)?;
    let engine = pipeline::build_engine(&config)?;

    info!(regions = regions.len(), thresholds = thresholds.len(), "running threshold sweep");
    let report = Backtester::new(&engine, store.as_ref(), &identities.table, bt_config)?
        .sweep(&regions, &thresholds)
        .context("threshold sweep failed")?;

    pipeline::emit(&report, args.output.as_deref())
}
