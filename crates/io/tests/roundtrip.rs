//! File round trips through the public hmhews-io API.

use std::path::Path;

use chrono::NaiveDate;
use hmhews_events::dibi::events_from_rows;
use hmhews_io::{
    Compression, IoError, WriterConfig, read_dibi_export, read_hierarchy, read_overrides,
    read_sample_table, write_json, write_overrides, write_sample_table,
};
use hmhews_regions::{AdminLevel, OverrideEntry, OverrideTable};
use hmhews_sources::SampleTable;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write(path: &Path, text: &str) {
    std::fs::write(path, text).expect("write fixture");
}

#[test]
fn sample_table_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let table: SampleTable = [
        ("IDN.12.4_1", ymd(2022, 12, 1), 42.5),
        ("IDN.12.4_1", ymd(2022, 12, 1), 3.0),
        ("IDN.12.4_1", ymd(2022, 12, 2), 0.0),
        ("IDN.31.1_1", ymd(2022, 11, 30), -9999.0),
    ]
    .into_iter()
    .collect();

    for compression in [Compression::None, Compression::Snappy, Compression::Zstd] {
        let path = dir.path().join(format!("chirps-{compression:?}.parquet"));
        let config = WriterConfig::default()
            .with_compression(compression)
            .with_row_group_size(2);
        write_sample_table(&path, &table, &config).expect("write succeeds");
        let back = read_sample_table(&path).expect("read succeeds");
        assert_eq!(back, table);
    }
}

#[test]
fn missing_sample_table() {
    let err = read_sample_table(Path::new("/nonexistent/samples.parquet")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn hierarchy_from_region_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gadm.json");
    write(
        &path,
        r#"[
            {"region_id": "IDN.12_1", "name": "Jawa Barat", "level": 1},
            {"region_id": "IDN.12.4_1", "name": "Bandung", "level": 2, "parent_id": "IDN.12_1"},
            {"region_id": "IDN.12.5_1", "name": "Bandung Barat", "level": 2, "parent_id": "IDN.12_1"}
        ]"#,
    );
    let h = read_hierarchy(&path, "gadm").unwrap();
    assert_eq!(h.name(), "gadm");
    assert_eq!(h.len(), 3);
    assert_eq!(h.at_level(AdminLevel::Regency).count(), 2);
    assert!(h.iter().all(|r| r.hierarchy_name() == "gadm"));
}

#[test]
fn invalid_hierarchy_is_a_region_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gadm.json");
    write(
        &path,
        r#"[
            {"region_id": "a", "name": "A", "level": 1},
            {"region_id": "a", "name": "A again", "level": 1}
        ]"#,
    );
    assert!(matches!(read_hierarchy(&path, "gadm"), Err(IoError::Region(_))));

    write(&path, "{not json");
    assert!(matches!(read_hierarchy(&path, "gadm"), Err(IoError::Json { .. })));
}

#[test]
fn dibi_export_to_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dibi.json");
    write(
        &path,
        r#"{"aaData": [
            {"level0": 32, "level1": "04", "nprop": "Jawa Barat", "nkab": "Bandung",
             "kejadian": "<a href='/d/r/3204-2022-0101'>x</a>", "tglan": "2022-12-01",
             "idj": "101", "menderita": "120", "mengungsi": 40},
            {"level0": "32", "level1": "3204", "tglan": "2022-12-03", "idj": 102}
        ]}"#,
    );
    let rows = read_dibi_export(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].district_id(), "3204");
    assert_eq!(rows[1].district_id(), "3204");

    // the second row has no incident link and is skipped
    let converted = events_from_rows(&rows);
    assert_eq!(converted.skipped, 1);
    let events = converted.events;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].region_id(), "3204");
    assert_eq!(events[0].date(), ymd(2022, 12, 1));
}

#[test]
fn overrides_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.toml");
    let table = OverrideTable::new()
        .with_link("IDN.12.4_1", "3204")
        .with_unresolved("IDN.31.1_1");
    write_overrides(&path, &table).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#""IDN.12.4_1" = "3204""#));

    let back = read_overrides(&path).unwrap();
    assert_eq!(back, table);
    assert_eq!(back.get("IDN.31.1_1"), Some(&OverrideEntry::Unresolved));
}

#[test]
fn json_report_is_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_json(&path, &serde_json::json!({"tp": 1, "fp": 1})).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"tp\": 1"));
}
