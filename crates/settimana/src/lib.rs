//! Settimana - agenda weeks for the school portal dashboard.
//!
//! Computes Monday-aligned week windows, fetches each window's agenda from the
//! backend at most once, prefetches the neighbouring weeks, and drives the
//! day-column carousel that moves between slides and weeks.

pub mod agenda;
pub mod cache;
pub mod controller;
pub mod dashboard;
pub mod date_window;
pub mod error;
pub mod fetcher;
pub mod grades;
pub mod navigator;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use agenda::{day_slots, decode_agenda, AgendaEvent, DaySlot};
pub use cache::{AgendaCache, Payload, SharedCache};
pub use controller::{WeekController, WeekView};
pub use dashboard::Dashboard;
pub use date_window::{CacheKey, DateInterval};
pub use error::{AgendaError, SessionError, TransportError};
pub use fetcher::{AgendaFetcher, FetchKind};
pub use grades::{decode_grades, group_by_subject, Grade, SubjectGrades};
pub use navigator::{Direction, EdgePolicy, NavigationState, SlideNavigator, Step};
pub use session::{AuthFailureHandler, SessionFlag};
pub use transport::{AgendaTransport, Endpoint, HttpTransport};
