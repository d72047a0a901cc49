//! Week transitions: load the requested week, commit it, and warm the cache
//! with its neighbours.

use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::agenda::{day_slots, decode_agenda, AgendaEvent, DaySlot};
use crate::cache::Payload;
use crate::date_window::DateInterval;
use crate::error::AgendaError;
use crate::fetcher::{AgendaFetcher, FetchKind};

/// Source of "today" for week arithmetic.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// A loaded week, ready for rendering.
#[derive(Debug, Clone)]
pub struct WeekView {
    pub offset: i64,
    pub interval: DateInterval,
    pub payload: Payload,
    pub events: Vec<AgendaEvent>,
}

impl WeekView {
    /// Lay the week's events out as day columns.
    pub fn slots(&self) -> Vec<DaySlot> {
        day_slots(&self.interval, &self.events)
    }
}

/// Orchestrates week loads and adjacent-week prefetching.
///
/// Every load takes a generation ticket. A load whose primary fetch resolves
/// after a newer load was issued is not committed.
pub struct WeekController {
    fetcher: AgendaFetcher,
    clock: Clock,
    current_offset: AtomicI64,
    generation: AtomicU64,
    prefetches: Mutex<Vec<JoinHandle<()>>>,
}

impl WeekController {
    /// Controller using the local calendar day.
    pub fn new(fetcher: AgendaFetcher) -> Self {
        Self::with_clock(fetcher, Arc::new(|| Local::now().date_naive()))
    }

    pub fn with_clock(fetcher: AgendaFetcher, clock: Clock) -> Self {
        Self {
            fetcher,
            clock,
            current_offset: AtomicI64::new(0),
            generation: AtomicU64::new(0),
            prefetches: Mutex::new(Vec::new()),
        }
    }

    /// Offset of the last committed week.
    pub fn current_offset(&self) -> i64 {
        self.current_offset.load(Ordering::SeqCst)
    }

    pub fn interval_for(&self, offset: i64) -> Result<DateInterval, AgendaError> {
        DateInterval::for_week(offset, (self.clock)())
    }

    /// Load week `offset`, commit it as current, then prefetch both neighbours.
    ///
    /// A payload that does not decode is evicted and nothing is committed.
    pub async fn load_week(&self, offset: i64) -> Result<WeekView, AgendaError> {
        let interval = self.interval_for(offset)?;
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(offset, interval = %interval, "Loading agenda week");

        let payload = self
            .fetcher
            .fetch_interval(&interval, FetchKind::Primary)
            .await?;

        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(offset, "Discarding superseded week load");
            return Err(AgendaError::Superseded { requested: offset });
        }

        let events = match decode_agenda(&payload) {
            Ok(events) => events,
            Err(e) => {
                warn!(offset, error = %e, "Malformed agenda week, evicting");
                self.fetcher.cache().lock().await.remove(&interval.key());
                return Err(e);
            }
        };
        self.current_offset.store(offset, Ordering::SeqCst);

        for neighbour in [offset.checked_sub(1), offset.checked_add(1)]
            .into_iter()
            .flatten()
        {
            self.spawn_prefetch(neighbour).await;
        }

        Ok(WeekView {
            offset,
            interval,
            payload,
            events,
        })
    }

    pub async fn go_to_next_week(&self) -> Result<WeekView, AgendaError> {
        self.load_week(self.current_offset().saturating_add(1)).await
    }

    pub async fn go_to_prev_week(&self) -> Result<WeekView, AgendaError> {
        self.load_week(self.current_offset().saturating_sub(1)).await
    }

    /// Wait for every prefetch issued so far.
    pub async fn wait_for_prefetches(&self) {
        let handles = std::mem::take(&mut *self.prefetches.lock().await);
        for handle in handles {
            // prefetch tasks swallow their own errors; a join error is a panic or abort
            let _ = handle.await;
        }
    }

    async fn spawn_prefetch(&self, offset: i64) {
        let interval = match self.interval_for(offset) {
            Ok(interval) => interval,
            Err(e) => {
                debug!(offset, error = %e, "Skipping prefetch");
                return;
            }
        };

        let fetcher = self.fetcher.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = fetcher.fetch_interval(&interval, FetchKind::Prefetch).await {
                debug!(offset, error = %e, "Prefetch failed, ignoring");
            }
        });

        let mut prefetches = self.prefetches.lock().await;
        prefetches.retain(|h| !h.is_finished());
        prefetches.push(handle);
    }
}
