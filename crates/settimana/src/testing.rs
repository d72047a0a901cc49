//! In-memory collaborators shared by the unit tests.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::date_window::{CacheKey, DateInterval};
use crate::error::TransportError;
use crate::session::AuthFailureHandler;
use crate::transport::AgendaTransport;

/// Wednesday, 2025-01-15.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

pub fn interval(offset: i64) -> DateInterval {
    DateInterval::for_week(offset, today()).unwrap()
}

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Status(u16),
    Network,
}

/// Agenda backend that records every request it receives.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<CacheKey>>,
    failures: Mutex<HashMap<CacheKey, Failure>>,
    malformed: Mutex<HashSet<CacheKey>>,
    gates: Mutex<HashMap<CacheKey, Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, interval: &DateInterval, failure: Failure) {
        self.failures.lock().unwrap().insert(interval.key(), failure);
    }

    /// Answer `interval` with a well-formed envelope whose events don't decode.
    pub fn malform(&self, interval: &DateInterval) {
        self.malformed.lock().unwrap().insert(interval.key());
    }

    pub fn repair(&self, interval: &DateInterval) {
        self.malformed.lock().unwrap().remove(&interval.key());
    }

    /// Hold requests for `interval` until the returned gate is notified.
    pub fn hold(&self, interval: &DateInterval) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(interval.key(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<CacheKey> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, interval: &DateInterval) -> usize {
        let key = interval.key();
        self.calls.lock().unwrap().iter().filter(|k| **k == key).count()
    }
}

/// Backend envelope with one lesson on each weekday of `interval`.
pub fn agenda_body(interval: &DateInterval) -> Value {
    let events: Vec<Value> = interval
        .days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, day)| {
            json!({
                "evtId": i as i64 + 1,
                "evtCode": "AGNT",
                "evtDatetimeBegin": format!("{}T08:00:00+01:00", day.format("%Y-%m-%d")),
                "evtDatetimeEnd": format!("{}T09:00:00+01:00", day.format("%Y-%m-%d")),
                "isFullDay": false,
                "notes": format!("Lezione {}", day.format("%Y%m%d")),
                "authorName": "ROSSI MARIO",
                "classDesc": "3A",
                "subjectDesc": "MATEMATICA"
            })
        })
        .collect();
    json!({ "ok": true, "agenda": { "agenda": events } })
}

#[async_trait]
impl AgendaTransport for FakeTransport {
    async fn fetch_agenda(&self, interval: &DateInterval) -> Result<Value, TransportError> {
        let key = interval.key();
        self.calls.lock().unwrap().push(key.clone());

        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failure = self.failures.lock().unwrap().get(&key).copied();
        match failure {
            Some(Failure::Status(status)) => Err(TransportError::Status(status)),
            Some(Failure::Network) => Err(TransportError::Network("connection refused".into())),
            None if self.malformed.lock().unwrap().contains(&key) => {
                let mut body = agenda_body(interval);
                body["agenda"]["agenda"][0]["evtId"] = json!("x");
                Ok(body)
            }
            None => Ok(agenda_body(interval)),
        }
    }
}

/// Auth-failure collaborator that only counts invocations.
#[derive(Default)]
pub struct RecordingAuth {
    failures: AtomicUsize,
}

impl RecordingAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl AuthFailureHandler for RecordingAuth {
    fn on_auth_failure(&self, _status: u16) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}
