//! Backtest command: score the hazard index at one threshold.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hmhews_evaluate::Backtester;

use crate::cli::BacktestArgs;
use crate::config::HmhewsConfig;
use crate::{convert, pipeline};

pub fn run(args: BacktestArgs) -> Result<()> {
    let _cmd = info_span!("backtest").entered();
    let config = HmhewsConfig::load(&args.config)?;

    // Everything configurable is checked before any file is read.
    let threshold = convert::build_threshold(&config.backtest, args.threshold)?;
    let bt_config = convert::build_backtest_config(&config, threshold)?;

    let rows = pipeline::read_export(&config)?;
    let identities = pipeline::resolve_identities(&config, &rows)?;
    let regions = identities.evaluated_regions(&config)?;
    let store = pipeline::build_store(&config, &rows)?;
    let engine = pipeline::build_engine(&config)?;

    info!(regions = regions.len(), threshold = threshold.value(), "running backtest");
    let report = Backtester::new(&engine, store.as_ref(), &identities.table, bt_config)?
        .evaluate(&regions)
        .context("backtest failed")?;

    pipeline::emit(&report, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn report(args: BacktestArgs) -> serde_json::Value {
        let out = args.output.clone().unwrap();
        run(args).unwrap();
        serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap()
    }

    #[test]
    fn two_regencies_three_days() {
        let project = fixtures::project();
        let r = report(BacktestArgs {
            config: project.config.clone(),
            output: Some(project.path("report.json")),
            threshold: None,
        });
        assert_eq!(r["tp"], 1);
        assert_eq!(r["fp"], 1);
        assert_eq!(r["fn"], 1);
        assert_eq!(r["tn"], 2);
        assert_eq!(r["no_data_cells"], 1);
        assert_eq!(r["accuracy"], 0.6);
        assert_eq!(r["config"]["hazard_sources"][0], "hazard");
    }

    #[test]
    fn threshold_flag_overrides_config() {
        let project = fixtures::project();
        let r = report(BacktestArgs {
            config: project.config.clone(),
            output: Some(project.path("report.json")),
            threshold: Some(0.0),
        });
        assert_eq!(r["fn"], 0);
        assert_eq!(r["tn"], 0);
        assert_eq!(r["config"]["hazard_threshold"], 0.0);
    }

    #[test]
    fn unreachable_live_store_aborts() {
        let project = fixtures::project();
        let url = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}/get_dibi3x", listener.local_addr().unwrap())
        };
        let text = std::fs::read_to_string(&project.config).unwrap().replace(
            "[events]\n",
            &format!("[events]\nstore = \"dibi_http\"\nurl = '{url}'\ntimeout_secs = 2\n"),
        );
        std::fs::write(&project.config, text).unwrap();

        let err = run(BacktestArgs {
            config: project.config.clone(),
            output: None,
            threshold: None,
        })
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("backtest failed"), "{msg}");
        assert!(msg.contains("unavailable"), "{msg}");
    }

    #[test]
    fn out_of_scale_threshold_fails_before_loading() {
        let project = fixtures::project();
        let err = run(BacktestArgs {
            config: project.config.clone(),
            output: None,
            threshold: Some(1.5),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid hazard threshold"));
    }
}
