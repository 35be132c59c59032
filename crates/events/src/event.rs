//! Disaster events.

use hmhews_calendar::NaiveDate;
use serde::{Deserialize, Serialize};

/// DIBI disaster category. Only floods are modelled by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// DIBI code `101` (banjir).
    Flood,
    /// Any other DIBI code, kept verbatim.
    Other(String),
}

impl EventType {
    pub const FLOOD_CODE: &'static str = "101";

    /// The DIBI numeric code.
    pub fn code(&self) -> &str {
        match self {
            Self::Flood => Self::FLOOD_CODE,
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for EventType {
    fn from(code: &str) -> Self {
        let code = code.trim();
        if code == Self::FLOOD_CODE || code.eq_ignore_ascii_case("flood") {
            Self::Flood
        } else {
            Self::Other(code.to_string())
        }
    }
}

impl From<String> for EventType {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> String {
        t.code().to_string()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// People affected by an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victims {
    pub died: u32,
    pub missing: u32,
    pub injured: u32,
    pub suffering: u32,
    pub evacuated: u32,
}

impl Victims {
    /// Sum of all victim categories.
    pub fn affected(&self) -> u64 {
        [self.died, self.missing, self.injured, self.suffering, self.evacuated]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }
}

/// Houses damaged by an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDamage {
    pub severe: u32,
    pub moderate: u32,
    pub light: u32,
    pub submerged: u32,
}

/// Optional impact figures reported with an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Severity {
    pub victims: Victims,
    pub houses: HouseDamage,
}

/// One reported disaster. Ground truth; never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterEvent {
    event_id: String,
    region_id: String,
    date: NaiveDate,
    event_type: EventType,
    severity: Option<Severity>,
}

impl DisasterEvent {
    pub fn new(
        event_id: impl Into<String>,
        region_id: impl Into<String>,
        date: NaiveDate,
        event_type: EventType,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            region_id: region_id.into(),
            date,
            event_type,
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Disaster-database region id.
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn severity(&self) -> Option<&Severity> {
        self.severity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_code_round_trip() {
        assert_eq!(EventType::from("101"), EventType::Flood);
        assert_eq!(EventType::from(" flood "), EventType::Flood);
        assert_eq!(EventType::from("102"), EventType::Other("102".to_string()));
        assert_eq!(String::from(EventType::Flood), "101");
        assert_eq!(EventType::Other("105".into()).to_string(), "105");
    }

    #[test]
    fn affected_sums_all_categories() {
        let v = Victims {
            died: 1,
            missing: 2,
            injured: 3,
            suffering: 4,
            evacuated: 5,
        };
        assert_eq!(v.affected(), 15);
    }

    #[test]
    fn event_serializes_type_as_code() {
        let day = NaiveDate::from_ymd_opt(2022, 12, 26).unwrap();
        let e = DisasterEvent::new("9001", "3204", day, EventType::Flood);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""event_type":"101""#));
        let back: DisasterEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
