//! On-disk project used by command tests: two regencies over three days.

use std::path::{Path, PathBuf};

use hmhews_calendar::NaiveDate;
use hmhews_io::{WriterConfig, write_sample_table};
use hmhews_sources::SampleTable;
use tempfile::TempDir;

pub struct Project {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Project {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn ymd(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 12, d).unwrap()
}

fn write(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

/// Bandung and Bogor link by name; Cimahi has no DIBI counterpart.
pub fn project() -> Project {
    let dir = tempfile::tempdir().unwrap();
    let p = |name: &str| dir.path().join(name);

    write(
        &p("gadm.json"),
        r#"[
            {"region_id": "IDN.12_1", "name": "Jawa Barat", "level": 1},
            {"region_id": "IDN.12.4_1", "name": "Bandung", "level": 2, "parent_id": "IDN.12_1"},
            {"region_id": "IDN.12.1_1", "name": "Bogor", "level": 2, "parent_id": "IDN.12_1"},
            {"region_id": "IDN.12.9_1", "name": "Cimahi", "level": 2, "parent_id": "IDN.12_1"}
        ]"#,
    );
    write(
        &p("dibi.json"),
        r#"{"aaData": [
            {"level0": "32", "level1": "04", "nprop": "JAWA BARAT", "nkab": "BANDUNG",
             "kejadian": "<a href='/d/r/1'>Banjir</a>", "tglan": "2022-12-01", "idj": "101"},
            {"level0": "32", "level1": "01", "nprop": "JAWA BARAT", "nkab": "BOGOR",
             "kejadian": "<a href='/d/r/2'>Banjir</a>", "tglan": "2022-12-01", "idj": "101"}
        ]}"#,
    );

    let table: SampleTable = [
        ("IDN.12.4_1", ymd(1), 0.8),
        ("IDN.12.4_1", ymd(2), 0.5),
        ("IDN.12.4_1", ymd(3), 0.9),
        ("IDN.12.1_1", ymd(1), 0.6),
        ("IDN.12.1_1", ymd(2), 0.75),
    ]
    .into_iter()
    .collect();
    write_sample_table(&p("hazard.parquet"), &table, &WriterConfig::default()).unwrap();

    let config = p("hmhews.toml");
    write(
        &config,
        &format!(
            r#"
[backtest]
start = "2022-12-01"
end = "2022-12-03"
hazard_threshold = 0.7
region_filter = ["IDN.12.4_1", "IDN.12.1_1"]

[regions]
boundary = '{gadm}'

[events]
export = '{dibi}'

[[sources]]
id = "hazard"
kind = "historical_satellite"
path = '{hazard}'
weight = 1.0
scale_max = 1.0

[retry]
max_attempts = 1
"#,
            gadm = p("gadm.json").display(),
            dibi = p("dibi.json").display(),
            hazard = p("hazard.parquet").display(),
        ),
    );

    Project { dir, config }
}
