//! Cache-aware agenda fetching with separate failure handling for
//! speculative prefetches.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{Payload, SharedCache};
use crate::date_window::DateInterval;
use crate::error::{AgendaError, TransportError};
use crate::session::AuthFailureHandler;
use crate::transport::AgendaTransport;

/// Why a week is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The user asked for this week; a rejected session must be handled.
    Primary,
    /// Speculative load of a neighbouring week; failures stay silent.
    Prefetch,
}

/// Fetches week windows through the shared cache.
#[derive(Clone)]
pub struct AgendaFetcher {
    transport: Arc<dyn AgendaTransport>,
    cache: SharedCache,
    auth: Arc<dyn AuthFailureHandler>,
}

impl AgendaFetcher {
    pub fn new(
        transport: Arc<dyn AgendaTransport>,
        cache: SharedCache,
        auth: Arc<dyn AuthFailureHandler>,
    ) -> Self {
        Self {
            transport,
            cache,
            auth,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Return the agenda for `interval`, hitting the network only on a cache miss.
    pub async fn fetch_interval(
        &self,
        interval: &DateInterval,
        kind: FetchKind,
    ) -> Result<Payload, AgendaError> {
        let key = interval.key();

        if let Some(payload) = self.cache.lock().await.get(&key) {
            debug!(key = %key, ?kind, "Agenda cache hit");
            return Ok(payload);
        }

        debug!(key = %key, ?kind, "Fetching agenda");
        match self.transport.fetch_agenda(interval).await {
            Ok(body) => {
                let payload = Arc::new(body);
                self.cache.lock().await.put(key, payload.clone());
                Ok(payload)
            }
            Err(source) if kind == FetchKind::Prefetch => {
                Err(AgendaError::Prefetch { key, source })
            }
            Err(TransportError::Status(status)) => {
                warn!(key = %key, status, "Agenda request rejected");
                self.auth.on_auth_failure(status);
                Err(AgendaError::Auth { key, status })
            }
            Err(source) => Err(AgendaError::Network { key, source }),
        }
    }
}
