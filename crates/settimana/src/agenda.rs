//! Typed view of the `/agenda` payload and its layout into day columns.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date_window::DateInterval;
use crate::error::AgendaError;

/// A single agenda event as published by the portal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    pub evt_id: i64,

    /// Event kind code (e.g. "AGNT" for a note, "AGHW" for homework)
    #[serde(default)]
    pub evt_code: String,

    pub evt_datetime_begin: DateTime<FixedOffset>,

    pub evt_datetime_end: DateTime<FixedOffset>,

    #[serde(default)]
    pub is_full_day: bool,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub author_name: String,

    #[serde(default)]
    pub class_desc: Option<String>,

    #[serde(default)]
    pub subject_desc: Option<String>,
}

impl AgendaEvent {
    /// Calendar day the event starts on, in the portal's own offset.
    pub fn day(&self) -> NaiveDate {
        self.evt_datetime_begin.date_naive()
    }
}

/// `{ "ok": true, "agenda": { "agenda": [...] } }`
#[derive(Debug, Deserialize)]
struct AgendaEnvelope {
    agenda: PortalAgenda,
}

#[derive(Debug, Deserialize)]
struct PortalAgenda {
    agenda: Vec<AgendaEvent>,
}

/// Decode a cached `/agenda` payload into events.
pub fn decode_agenda(payload: &Value) -> Result<Vec<AgendaEvent>, AgendaError> {
    let envelope = AgendaEnvelope::deserialize(payload)?;
    Ok(envelope.agenda.agenda)
}

/// One day column of the carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub events: Vec<AgendaEvent>,
}

/// Lay `events` out as day columns for `interval`.
///
/// Monday to Friday always get a column; the weekend only when something is
/// scheduled. Events outside the interval are dropped.
pub fn day_slots(interval: &DateInterval, events: &[AgendaEvent]) -> Vec<DaySlot> {
    interval
        .days()
        .filter_map(|date| {
            let mut day_events: Vec<AgendaEvent> =
                events.iter().filter(|e| e.day() == date).cloned().collect();
            let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            if weekend && day_events.is_empty() {
                return None;
            }
            day_events.sort_by_key(|e| e.evt_datetime_begin);
            Some(DaySlot {
                date,
                events: day_events,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn week() -> DateInterval {
        // Monday 2025-01-13 .. Sunday 2025-01-19
        DateInterval::for_week(0, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).unwrap()
    }

    fn event(id: i64, begin: &str) -> Value {
        json!({
            "evtId": id,
            "evtCode": "AGNT",
            "evtDatetimeBegin": begin,
            "evtDatetimeEnd": begin,
            "isFullDay": false,
            "notes": "Verifica capitolo 4",
            "authorName": "BIANCHI ANNA",
            "classDesc": "3A",
            "subjectDesc": "STORIA"
        })
    }

    fn envelope(events: Vec<Value>) -> Value {
        json!({ "ok": true, "agenda": { "agenda": events } })
    }

    // ========== decode_agenda ==========

    #[test]
    fn test_decode_agenda_envelope() {
        let payload = envelope(vec![event(7, "2025-01-14T10:00:00+01:00")]);
        let events = decode_agenda(&payload).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].evt_id, 7);
        assert_eq!(events[0].subject_desc.as_deref(), Some("STORIA"));
        assert_eq!(events[0].author_name, "BIANCHI ANNA");
        assert_eq!(events[0].day(), NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());
    }

    #[test]
    fn test_decode_agenda_optional_fields_default() {
        let payload = envelope(vec![json!({
            "evtId": 1,
            "evtDatetimeBegin": "2025-01-14T00:00:00+01:00",
            "evtDatetimeEnd": "2025-01-14T23:59:59+01:00"
        })]);
        let events = decode_agenda(&payload).unwrap();

        assert!(!events[0].is_full_day);
        assert!(events[0].notes.is_empty());
        assert!(events[0].subject_desc.is_none());
    }

    #[test]
    fn test_decode_agenda_empty() {
        assert!(decode_agenda(&envelope(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_decode_agenda_rejects_other_shapes() {
        // top-level array and single-level nesting are not the backend contract
        assert!(decode_agenda(&json!([])).is_err());
        assert!(decode_agenda(&json!({ "agenda": [] })).is_err());
        assert!(matches!(
            decode_agenda(&json!({ "ok": true })),
            Err(AgendaError::Decode(_))
        ));
    }

    // ========== day_slots ==========

    #[test]
    fn test_day_slots_empty_week_has_five_weekdays() {
        let slots = day_slots(&week(), &[]);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0].date.weekday(), Weekday::Mon);
        assert_eq!(slots[4].date.weekday(), Weekday::Fri);
        assert!(slots.iter().all(|s| s.events.is_empty()));
    }

    #[test]
    fn test_day_slots_includes_weekend_with_events() {
        let payload = envelope(vec![event(1, "2025-01-18T09:00:00+01:00")]);
        let events = decode_agenda(&payload).unwrap();

        let slots = day_slots(&week(), &events);

        assert_eq!(slots.len(), 6);
        assert_eq!(slots[5].date.weekday(), Weekday::Sat);
        assert_eq!(slots[5].events.len(), 1);
    }

    #[test]
    fn test_day_slots_sorts_events_by_start() {
        let payload = envelope(vec![
            event(2, "2025-01-13T11:00:00+01:00"),
            event(1, "2025-01-13T08:00:00+01:00"),
        ]);
        let events = decode_agenda(&payload).unwrap();

        let slots = day_slots(&week(), &events);

        let ids: Vec<_> = slots[0].events.iter().map(|e| e.evt_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_day_slots_drops_events_outside_interval() {
        let payload = envelope(vec![event(1, "2025-01-21T08:00:00+01:00")]);
        let events = decode_agenda(&payload).unwrap();

        let slots = day_slots(&week(), &events);

        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| s.events.is_empty()));
    }
}
