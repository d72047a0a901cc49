//! Network access to the dashboard backend.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::date_window::DateInterval;
use crate::error::TransportError;

/// Default backend address.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Name of the session cookie issued by the backend at login.
const SESSION_COOKIE: &str = "session_id";

/// Fetches the agenda for one week window.
#[async_trait]
pub trait AgendaTransport: Send + Sync {
    async fn fetch_agenda(&self, interval: &DateInterval) -> Result<Value, TransportError>;
}

/// Backend endpoints sharing the session-cookie convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Agenda,
    Card,
    LezioniOggi,
    Voti,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Agenda => "/agenda",
            Endpoint::Card => "/card",
            Endpoint::LezioniOggi => "/lezioni_oggi",
            Endpoint::Voti => "/voti",
        }
    }
}

/// JSON body of `POST /agenda`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaRequest {
    pub start: String,
    pub end: String,
}

impl From<&DateInterval> for AgendaRequest {
    fn from(interval: &DateInterval) -> Self {
        Self {
            start: interval.start_param(),
            end: interval.end_param(),
        }
    }
}

/// reqwest-backed transport attaching the session cookie to every request.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, session_id: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            session_id: session_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST` to `endpoint` with an optional JSON body and decode the JSON reply.
    pub async fn post_endpoint<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut request = self
            .client
            .post(&url)
            .header("Cookie", format!("{}={}", SESSION_COOKIE, self.session_id));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%url, "POST");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            debug!(%url, status = status.as_u16(), %detail, "Backend rejected request");
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

#[async_trait]
impl AgendaTransport for HttpTransport {
    async fn fetch_agenda(&self, interval: &DateInterval) -> Result<Value, TransportError> {
        let body = AgendaRequest::from(interval);
        self.post_endpoint(Endpoint::Agenda, Some(&body)).await
    }
}
