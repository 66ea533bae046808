//! Shared data models: events and the stored events document.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::{CalendarDate, TimeOfDay};
use crate::{Error, Result};

/// Completion state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Done,
}

impl EventStatus {
    pub fn toggled(self) -> Self {
        match self {
            EventStatus::Pending => EventStatus::Done,
            EventStatus::Done => EventStatus::Pending,
        }
    }
}

/// A planned event.
///
/// Older documents used `time` / `timeEnd` for the start and end fields and
/// may lack the end entirely; both spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Creation timestamp in milliseconds, unique within a document
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: CalendarDate,
    #[serde(alias = "time")]
    pub start_time: TimeOfDay,
    #[serde(
        alias = "timeEnd",
        default,
        deserialize_with = "blank_time_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<TimeOfDay>,
    pub status: EventStatus,
}

impl Event {
    /// End time, falling back to one hour after the start.
    pub fn effective_end(&self) -> TimeOfDay {
        self.end_time
            .unwrap_or_else(|| self.start_time.plus_hours(1))
    }

    /// Fill a missing end time with the one-hour default.
    pub fn with_end_time_filled(mut self) -> Self {
        if self.end_time.is_none() {
            self.end_time = Some(self.start_time.plus_hours(1));
        }
        self
    }

    /// Whether this event occupies any part of the given hour slot.
    pub fn occupies_hour(&self, hour: u8) -> bool {
        TimeOfDay::overlaps_hour(self.start_time, self.effective_end(), hour)
    }

    pub fn is_done(&self) -> bool {
        self.status == EventStatus::Done
    }
}

fn blank_time_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The single stored document holding every event.
///
/// `events` is required and no other keys are allowed, so a body that is not
/// shaped like a document can never be stored as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    pub events: Vec<Event>,
}

impl Document {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Check document-level invariants that the per-field types cannot.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.events.len());
        for event in &self.events {
            if !seen.insert(event.id) {
                return Err(Error::Validation(format!("duplicate event id {}", event.id)));
            }
        }
        Ok(())
    }

    /// Parse and validate a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: Document = serde_json::from_slice(bytes)
            .map_err(|e| Error::Validation(format!("Invalid events document: {}", e)))?;
        document.validate()?;
        Ok(document)
    }

    /// Serialize to compact JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_format() {
        let json = br#"{"events":[{"id":1718000000000,"title":"Spotkanie z Diego","description":"Stary Oboz","date":"2025-02-14","startTime":"09:30","endTime":"11:00","status":"pending"}]}"#;
        let doc = Document::from_slice(json).unwrap();
        let event = &doc.events[0];
        assert_eq!(event.id, 1718000000000);
        assert_eq!(event.start_time.to_string(), "09:30");
        assert_eq!(event.end_time.map(|t| t.to_string()), Some("11:00".to_string()));
        assert_eq!(event.status, EventStatus::Pending);
    }

    #[test]
    fn test_parse_legacy_field_names() {
        let json = br#"{"events":[{"id":7,"title":"Trening","description":"","date":"2025-01-03","time":"23:30","status":"done"}]}"#;
        let doc = Document::from_slice(json).unwrap();
        let event = &doc.events[0];
        assert_eq!(event.start_time.to_string(), "23:30");
        assert_eq!(event.end_time, None);
        assert_eq!(event.effective_end().to_string(), "00:30");
        assert!(event.is_done());
    }

    #[test]
    fn test_blank_end_time_is_missing() {
        let json = br#"{"events":[{"id":7,"title":"Trening","date":"2025-01-03","time":"08:10","timeEnd":"","status":"pending"}]}"#;
        let doc = Document::from_slice(json).unwrap();
        assert_eq!(doc.events[0].end_time, None);
        assert_eq!(doc.events[0].description, "");
    }

    #[test]
    fn test_serializes_current_field_names() {
        let event = Event {
            id: 1,
            title: "Warta".to_string(),
            description: String::new(),
            date: "2025-05-05".parse().unwrap(),
            start_time: "06:00".parse().unwrap(),
            end_time: Some("07:00".parse().unwrap()),
            status: EventStatus::Done,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["startTime"], "06:00");
        assert_eq!(value["endTime"], "07:00");
        assert_eq!(value["status"], "done");
        assert!(value.get("time").is_none());
    }

    #[test]
    fn test_rejects_malformed_documents() {
        let bad_status = br#"{"events":[{"id":1,"title":"x","date":"2025-01-01","startTime":"10:00","status":"later"}]}"#;
        assert!(matches!(Document::from_slice(bad_status), Err(Error::Validation(_))));

        let bad_day = br#"{"events":[{"id":1,"title":"x","date":"2025-01-30","startTime":"10:00","status":"pending"}]}"#;
        assert!(matches!(Document::from_slice(bad_day), Err(Error::Validation(_))));

        let duplicate = br#"{"events":[
            {"id":1,"title":"a","date":"2025-01-01","startTime":"10:00","status":"pending"},
            {"id":1,"title":"b","date":"2025-01-02","startTime":"10:00","status":"pending"}]}"#;
        assert!(matches!(Document::from_slice(duplicate), Err(Error::Validation(_))));

        assert!(Document::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_rejects_bodies_without_events() {
        let bodies: [&[u8]; 4] = [b"{}", b"[]", br#"{"evnts":[]}"#, br#"{"events":[],"extra":1}"#];
        for body in bodies {
            assert!(
                matches!(Document::from_slice(body), Err(Error::Validation(_))),
                "accepted {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_empty_events_list_is_valid() {
        let doc = Document::from_slice(br#"{"events":[]}"#).unwrap();
        assert!(doc.events.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        assert_eq!(EventStatus::Pending.toggled(), EventStatus::Done);
        assert_eq!(EventStatus::Pending.toggled().toggled(), EventStatus::Pending);
    }
}
