//! Plain-text output for the terminal dashboard.

use chrono::NaiveDate;
use serde_json::Value;
use std::fmt::Write;

use settimana::{DateInterval, DaySlot, NavigationState, SubjectGrades};

const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"];

fn day_label(date: NaiveDate) -> String {
    use chrono::Datelike;
    let name = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    format!("{} {}", name, date.format("%d/%m"))
}

/// Header line for a week.
pub fn week_header(interval: &DateInterval, offset: i64) -> String {
    format!(
        "Settimana {} - {} (offset {:+})",
        interval.start.format("%d/%m/%Y"),
        interval.end.format("%d/%m/%Y"),
        offset
    )
}

/// Which day columns the carousel shows, e.g. "Giorni 2-4 di 5".
pub fn carousel_position(state: &NavigationState, total_slots: usize) -> String {
    let first = state.slide_index.min(total_slots);
    let last = (state.slide_index + state.slides_per_view).min(total_slots);
    format!("Giorni {}-{} di {}", first + 1, last, total_slots)
}

/// One block per day column.
pub fn day_columns(slots: &[DaySlot]) -> String {
    let mut out = String::new();
    for slot in slots {
        let _ = writeln!(out, "{}", day_label(slot.date));
        if slot.events.is_empty() {
            let _ = writeln!(out, "  (nessun evento)");
        }
        for event in &slot.events {
            let time = if event.is_full_day {
                "tutto il giorno".to_string()
            } else {
                event.evt_datetime_begin.format("%H:%M").to_string()
            };
            let subject = event.subject_desc.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {} {} {}", time, subject, event.notes);
        }
    }
    out
}

/// Grades grouped under each subject, newest first.
pub fn grade_list(groups: &[SubjectGrades]) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(out, "(nessun voto)");
    }
    for group in groups {
        let _ = writeln!(out, "{}", group.subject);
        for grade in &group.grades {
            let notes = grade.notes_for_family.as_deref().unwrap_or("");
            let line = format!(
                "  {} {:>4} {}",
                grade.evt_date.format("%d/%m/%Y"),
                grade.display_value,
                notes
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }
    }
    out
}

/// Pretty JSON of the named field of a backend envelope, or the whole body.
pub fn envelope_field(body: &Value, field: &str) -> String {
    let inner = body.get(field).unwrap_or(body);
    serde_json::to_string_pretty(inner).unwrap_or_else(|_| inner.to_string())
}
