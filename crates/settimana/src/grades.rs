//! Typed view of the `/voti` payload, grouped per subject.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single grade as published by the portal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub subject_desc: String,

    pub evt_date: NaiveDate,

    /// Grade as shown to families (e.g. "7+", "6½")
    pub display_value: String,

    #[serde(default)]
    pub notes_for_family: Option<String>,

    #[serde(default)]
    pub author_name: Option<String>,
}

/// `{ "ok": true, "voti": { "grades": [...] } }`
#[derive(Debug, Deserialize)]
struct GradesEnvelope {
    voti: PortalGrades,
}

#[derive(Debug, Deserialize)]
struct PortalGrades {
    grades: Vec<Grade>,
}

/// Decode a `/voti` response body into grades.
pub fn decode_grades(body: &Value) -> Result<Vec<Grade>, serde_json::Error> {
    let envelope = GradesEnvelope::deserialize(body)?;
    Ok(envelope.voti.grades)
}

/// Grades of one subject, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectGrades {
    pub subject: String,
    pub grades: Vec<Grade>,
}

/// Group grades by subject. Subjects come out in alphabetical order.
pub fn group_by_subject(grades: Vec<Grade>) -> Vec<SubjectGrades> {
    let mut by_subject: BTreeMap<String, Vec<Grade>> = BTreeMap::new();
    for grade in grades {
        by_subject
            .entry(grade.subject_desc.clone())
            .or_default()
            .push(grade);
    }

    by_subject
        .into_iter()
        .map(|(subject, mut grades)| {
            grades.sort_by(|a, b| b.evt_date.cmp(&a.evt_date));
            SubjectGrades { subject, grades }
        })
        .collect()
}
