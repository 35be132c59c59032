//! DIBI export → events + hierarchy → identity resolution → positive days.

use hmhews_calendar::{DateRange, NaiveDate};
use hmhews_events::dibi::{DibiRow, events_from_rows, hierarchy_from_rows};
use hmhews_events::{EventFilter, EventStore, EventType, InMemoryEventStore, positive_dates};
use hmhews_regions::{AdminLevel, AdminRegion, Hierarchy, IdentityResolver};

const EXPORT: &str = r#"[
  {"level0": 32, "level1": 4, "nprop": "JAWA BARAT", "nkab": "BANDUNG",
   "kejadian": "<a href='/d/r/1001'>x</a>", "tglan": "2022-12-26", "idj": 101, "mengungsi": 12},
  {"level0": 32, "level1": 4, "nprop": "JAWA BARAT", "nkab": "BANDUNG",
   "kejadian": "<a href='/d/r/1002'>x</a>", "tglan": "2022-12-26", "idj": "101"},
  {"level0": 32, "level1": 71, "nprop": "JAWA BARAT", "nkab": "KOTA BOGOR",
   "kejadian": "<a href='/d/r/1003'>x</a>", "tglan": "2022-12-28", "idj": 102},
  {"level0": 32, "level1": 71, "nprop": "JAWA BARAT", "nkab": "KOTA BOGOR",
   "kejadian": "<a href='/d/r/1004'>x</a>", "tglan": "2023-01-02", "idj": 101, "menderita": 3}
]"#;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rows() -> Vec<DibiRow> {
    serde_json::from_str(EXPORT).unwrap()
}

#[test]
fn export_feeds_store_and_filter() {
    let converted = events_from_rows(&rows());
    assert_eq!(converted.skipped, 0);
    let store = InMemoryEventStore::new("dibi", converted.events);
    assert_eq!(store.len(), 4);

    let december = DateRange::new(ymd(2022, 12, 1), ymd(2022, 12, 31)).unwrap();
    let bandung = store.query("3204", &december).unwrap();
    assert_eq!(bandung.len(), 2);
    let days = positive_dates(&bandung, &EventFilter::default());
    assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![ymd(2022, 12, 26)]);

    // the December event in Bogor is not a flood
    let bogor = store.query("3271", &december).unwrap();
    assert!(positive_dates(&bogor, &EventFilter::default()).is_empty());
    assert_eq!(
        positive_dates(&bogor, &EventFilter::any()).len(),
        1,
        "other types count when the filter accepts them"
    );
}

#[test]
fn min_affected_filters_small_events() {
    let store = InMemoryEventStore::new("dibi", events_from_rows(&rows()).events);
    let range = DateRange::new(ymd(2022, 12, 1), ymd(2023, 1, 31)).unwrap();
    let filter = EventFilter::default()
        .with_event_types(vec![EventType::Flood])
        .with_min_affected(Some(10));
    let bandung = positive_dates(&store.query("3204", &range).unwrap(), &filter);
    let bogor = positive_dates(&store.query("3271", &range).unwrap(), &filter);
    assert_eq!(bandung.len(), 1);
    assert!(bogor.is_empty());
}

#[test]
fn derived_hierarchy_resolves_against_boundaries() {
    let dibi = hierarchy_from_rows("dibi", &rows()).unwrap();
    assert_eq!(dibi.at_level(AdminLevel::Regency).count(), 2);

    let r = |level, id, name, parent| AdminRegion::new("gadm", level, id, name, parent);
    let gadm = Hierarchy::new(
        "gadm",
        vec![
            r(AdminLevel::Province, "IDN.9_1", "Jawa Barat", None),
            r(AdminLevel::Regency, "IDN.9.1_1", "Bandung", Some("IDN.9_1")),
            r(AdminLevel::Regency, "IDN.9.20_1", "Kota Bogor", Some("IDN.9_1")),
        ],
    )
    .unwrap();

    let table = IdentityResolver::default().resolve(&gadm, &dibi).unwrap();
    assert_eq!(table.target("IDN.9_1"), Some("32"));
    assert_eq!(table.target("IDN.9.1_1"), Some("3204"));
    assert_eq!(table.target("IDN.9.20_1"), Some("3271"));
}
