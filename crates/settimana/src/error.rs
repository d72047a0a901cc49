use crate::date_window::CacheKey;

/// Failures reported by an [`AgendaTransport`](crate::transport::AgendaTransport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No usable response: connection refused, reset, or similar.
    #[error("backend unreachable: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {0}")]
    Status(u16),
    /// A 2xx response whose body is not JSON.
    #[error("malformed response body: {0}")]
    Body(String),
}

/// Errors surfaced by the agenda core.
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error("agenda {key} could not be fetched: {source}")]
    Network {
        key: CacheKey,
        #[source]
        source: TransportError,
    },
    #[error("session rejected while fetching agenda {key} (HTTP {status})")]
    Auth { key: CacheKey, status: u16 },
    #[error("prefetch of agenda {key} failed: {source}")]
    Prefetch {
        key: CacheKey,
        #[source]
        source: TransportError,
    },
    #[error("load of week {requested} was superseded by a newer navigation")]
    Superseded { requested: i64 },
    #[error("week offset {0} falls outside the supported calendar range")]
    DateOutOfRange(i64),
    #[error("unexpected agenda payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AgendaError {
    /// Whether this error means the session is gone and the user must log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, AgendaError::Auth { .. })
    }
}

/// Errors reading or writing the persisted session flag.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse session file: {0}")]
    Json(#[from] serde_json::Error),
}
