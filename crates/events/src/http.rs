//! Live DIBI v3 event store (`get_dibi3x`).
//!
//! DIBI filters by province (`pr`), district suffix (`kb`), year (`th`) and
//! disaster type (`jn`), and pages with `start` / `length`. The store asks
//! for one (district, year) at a time, pages until a short page comes back
//! and caches the converted events for the life of the store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Datelike;
use hmhews_calendar::DateRange;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dibi::DibiRow;
use crate::error::StoreError;
use crate::event::{DisasterEvent, EventType};
use crate::store::EventStore;

/// Default DIBI endpoint.
pub const DIBI_URL: &str = "https://dibi.bnpb.go.id/dibi3x/get_dibi3x";

/// Connection settings for [`DibiHttpStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct DibiHttpConfig {
    url: String,
    timeout: Duration,
    page_size: usize,
    disaster_type: Option<EventType>,
}

impl Default for DibiHttpConfig {
    fn default() -> Self {
        Self {
            url: DIBI_URL.to_string(),
            timeout: Duration::from_secs(30),
            page_size: 1000,
            disaster_type: None,
        }
    }
}

impl DibiHttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Per-request timeout, connect included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rows requested per page. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Restricts server-side to one disaster type; `None` fetches all.
    pub fn with_disaster_type(mut self, disaster_type: Option<EventType>) -> Self {
        self.disaster_type = disaster_type;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn disaster_type(&self) -> Option<&EventType> {
        self.disaster_type.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(rename = "aaData", default)]
    rows: Vec<DibiRow>,
}

/// Events fetched from DIBI over HTTP.
#[derive(Debug)]
pub struct DibiHttpStore {
    name: String,
    client: Client,
    config: DibiHttpConfig,
    cache: Mutex<HashMap<(String, i32), Vec<DisasterEvent>>>,
    skipped: AtomicU64,
}

impl DibiHttpStore {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the TLS backend cannot be
    /// initialised.
    pub fn new(name: impl Into<String>, config: DibiHttpConfig) -> Result<Self, StoreError> {
        let name = name.into();
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable {
                store: name.clone(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        info!(store = %name, url = %config.url, timeout_s = config.timeout.as_secs_f64(), "DIBI store ready");
        Ok(Self {
            name,
            client,
            config,
            cache: Mutex::new(HashMap::new()),
            skipped: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &DibiHttpConfig {
        &self.config
    }

    /// All events DIBI holds for `region_id` in `year`, cached.
    fn year_events(&self, region_id: &str, year: i32) -> Result<Vec<DisasterEvent>, StoreError> {
        let key = (region_id.to_string(), year);
        if let Some(hit) = self.lock_cache().get(&key) {
            return Ok(hit.clone());
        }

        let (province, district) = split_region(region_id);
        let mut events = Vec::new();
        let mut start = 0;
        loop {
            let rows = self.fetch_page(region_id, province, district, year, start)?;
            let fetched = rows.len();
            for (offset, row) in rows.iter().enumerate() {
                match row.to_event(start + offset) {
                    // `kb` is ignored for provinces without district codes
                    Ok(event) if event.region_id() == region_id || district.is_empty() => {
                        events.push(event);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        self.skipped.fetch_add(1, Ordering::Relaxed);
                        warn!(store = %self.name, error = %e, "skipping DIBI row");
                    }
                }
            }
            if fetched < self.config.page_size {
                break;
            }
            start += fetched;
        }
        events.sort_by_key(DisasterEvent::date);
        debug!(store = %self.name, region = region_id, year, events = events.len(), "DIBI year fetched");

        self.lock_cache().insert(key, events.clone());
        Ok(events)
    }

    fn fetch_page(
        &self,
        region_id: &str,
        province: &str,
        district: &str,
        year: i32,
        start: usize,
    ) -> Result<Vec<DibiRow>, StoreError> {
        let disaster_type = self
            .config
            .disaster_type
            .as_ref()
            .map(EventType::code)
            .unwrap_or_default();
        let form = [
            ("start", start.to_string()),
            ("length", self.config.page_size.to_string()),
            ("search[value]", String::new()),
            ("search[regex]", "false".to_string()),
            ("pr", province.to_string()),
            ("kb", district.to_string()),
            ("th", year.to_string()),
            ("bl", String::new()),
            ("jn", disaster_type.to_string()),
            ("cr", String::new()),
        ];
        let body = self.post(&form, region_id)?;
        parse_page(&body).map_err(|reason| self.query_error(region_id, reason))
    }

    fn post(&self, form: &[(&str, String)], region_id: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .post(&self.config.url)
            .header(reqwest::header::ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .form(form)
            .send()
            .map_err(|e| self.transport_error(region_id, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = format!("HTTP {status}");
            return Err(if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                self.unavailable(reason)
            } else {
                self.query_error(region_id, reason)
            });
        }
        response
            .text()
            .map_err(|e| self.transport_error(region_id, &e))
    }

    fn transport_error(&self, region_id: &str, e: &reqwest::Error) -> StoreError {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            self.unavailable(e.to_string())
        } else {
            self.query_error(region_id, e.to_string())
        }
    }

    fn unavailable(&self, reason: String) -> StoreError {
        StoreError::Unavailable {
            store: self.name.clone(),
            reason,
        }
    }

    fn query_error(&self, region_id: &str, reason: String) -> StoreError {
        StoreError::Query {
            store: self.name.clone(),
            region_id: region_id.to_string(),
            reason,
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<(String, i32), Vec<DisasterEvent>>> {
        // a poisoned cache only ever held complete entries
        self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl EventStore for DibiHttpStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_available(&self) -> Result<(), StoreError> {
        let form = [
            ("start", "0".to_string()),
            ("length", "1".to_string()),
        ];
        let body = self.post(&form, "")?;
        parse_page(&body).map_err(|reason| self.unavailable(reason))?;
        Ok(())
    }

    fn query(&self, region_id: &str, range: &DateRange) -> Result<Vec<DisasterEvent>, StoreError> {
        let mut events = Vec::new();
        for year in range.start().year()..=range.end().year() {
            events.extend(
                self.year_events(region_id, year)?
                    .into_iter()
                    .filter(|e| range.contains(e.date())),
            );
        }
        Ok(events)
    }

    fn skipped_records(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Splits a DIBI region id into the `pr` and `kb` form fields.
fn split_region(region_id: &str) -> (&str, &str) {
    if region_id.len() > 2 && region_id.is_char_boundary(2) {
        region_id.split_at(2)
    } else {
        (region_id, "")
    }
}

/// Parses a `get_dibi3x` body. DIBI answers an empty body when nothing
/// matches.
fn parse_page(body: &str) -> Result<Vec<DibiRow>, String> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Page>(body)
        .map(|page| page.rows)
        .map_err(|e| format!("unparsable response: {e}"))
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use hmhews_calendar::NaiveDate;

    use super::*;

    fn row(id: u32, district: &str, date: &str) -> String {
        format!(
            r#"{{"level0":"32","level1":"{district}","nkab":"X","kejadian":"<a href=\"/d/r/{id}\">BANJIR</a>","tglan":"{date}","idj":101}}"#
        )
    }

    /// Serves `responses` in order, one per connection, and returns the
    /// request bodies it saw.
    fn serve(responses: Vec<(u16, String)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/get_dibi3x", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut bodies = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);
                let mut length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(v) = lower.strip_prefix("content-length:") {
                        length = v.trim().parse().unwrap();
                    }
                }
                let mut request = vec![0; length];
                reader.read_exact(&mut request).unwrap();
                bodies.push(String::from_utf8(request).unwrap());

                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                reader.get_mut().write_all(reply.as_bytes()).unwrap();
            }
            bodies
        });
        (url, handle)
    }

    fn store(url: &str, page_size: usize) -> DibiHttpStore {
        let config = DibiHttpConfig::new()
            .with_url(url)
            .with_timeout(Duration::from_secs(5))
            .with_page_size(page_size)
            .with_disaster_type(Some(EventType::Flood));
        DibiHttpStore::new("dibi", config).unwrap()
    }

    fn year_2022() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn pages_until_short_page_and_caches() {
        let page1 = format!(
            r#"{{"aaData":[{},{},{{"level0":"32","level1":"04"}}]}}"#,
            row(1, "04", "2022-12-26"),
            row(2, "04", "2022-03-01")
        );
        // another district's row comes back when DIBI ignores `kb`
        let page2 = format!(r#"{{"aaData":[{}]}}"#, row(3, "73", "2022-05-05"));
        let (url, server) = serve(vec![(200, page1), (200, page2)]);
        let s = store(&url, 3);

        let events = s.query("3204", &year_2022()).unwrap();
        let ids: Vec<_> = events.iter().map(DisasterEvent::event_id).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(s.skipped_records(), 1);

        // second query is served from the cache; the server is gone
        let again = s.query("3204", &DateRange::single(NaiveDate::from_ymd_opt(2022, 12, 26).unwrap()));
        assert_eq!(again.unwrap().len(), 1);

        let bodies = server.join().unwrap();
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("start=0"));
        assert!(bodies[0].contains("pr=32"));
        assert!(bodies[0].contains("kb=04"));
        assert!(bodies[0].contains("th=2022"));
        assert!(bodies[0].contains("jn=101"));
        assert!(bodies[1].contains("start=3"));
    }

    #[test]
    fn empty_body_means_no_events() {
        let (url, server) = serve(vec![(200, String::new())]);
        let s = store(&url, 10);
        assert!(s.query("3204", &year_2022()).unwrap().is_empty());
        server.join().unwrap();
    }

    #[test]
    fn bad_status_and_body_map_to_query_errors() {
        let (url, server) = serve(vec![(404, String::new()), (200, "<html>".to_string())]);
        let s = store(&url, 10);
        let err = s.query("3204", &year_2022()).unwrap_err();
        assert!(matches!(&err, StoreError::Query { reason, .. } if reason.contains("404")));
        let err = s.query("3204", &year_2022()).unwrap_err();
        assert!(matches!(&err, StoreError::Query { reason, .. } if reason.contains("unparsable")));
        server.join().unwrap();
    }

    #[test]
    fn server_error_is_unavailable() {
        let (url, server) = serve(vec![(503, String::new())]);
        let s = store(&url, 10);
        assert!(matches!(
            s.check_available(),
            Err(StoreError::Unavailable { .. })
        ));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_unavailable() {
        let url = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}/get_dibi3x", listener.local_addr().unwrap())
        };
        let s = store(&url, 10);
        assert!(matches!(
            s.query("3204", &year_2022()),
            Err(StoreError::Unavailable { .. })
        ));
    }

    #[test]
    fn region_split() {
        assert_eq!(split_region("3204"), ("32", "04"));
        assert_eq!(split_region("32"), ("32", ""));
    }
}
