//! The persisted "logged in" flag and the handler invoked when the backend
//! rejects the session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::error::SessionError;

const SESSION_FILE: &str = "session.json";

/// Reacts to a non-success response on a non-speculative request.
pub trait AuthFailureHandler: Send + Sync {
    fn on_auth_failure(&self, status: u16);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionState {
    #[serde(rename = "loggedIn")]
    logged_in: bool,
}

/// File-backed login flag gating every dashboard command.
///
/// Cleared as soon as the backend rejects the session cookie; the user then
/// has to log in again before the dashboard will load.
#[derive(Debug)]
pub struct SessionFlag {
    path: PathBuf,
    logged_in: AtomicBool,
}

impl SessionFlag {
    /// Load the flag from `state_dir`. A missing file means logged out.
    pub fn load(state_dir: &Path) -> Result<Self, SessionError> {
        let path = state_dir.join(SESSION_FILE);
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str::<SessionState>(&content)?
        } else {
            SessionState::default()
        };

        debug!(path = %path.display(), logged_in = state.logged_in, "Loaded session flag");
        Ok(Self {
            path,
            logged_in: AtomicBool::new(state.logged_in),
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    pub fn mark_logged_in(&self) -> Result<(), SessionError> {
        self.set(true)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.set(false)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set(&self, logged_in: bool) -> Result<(), SessionError> {
        self.logged_in.store(logged_in, Ordering::SeqCst);
        let json = serde_json::to_string_pretty(&SessionState { logged_in })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl AuthFailureHandler for SessionFlag {
    fn on_auth_failure(&self, status: u16) {
        warn!(status, "Backend rejected the session, login required");
        if let Err(e) = self.clear() {
            warn!(error = %e, path = %self.path.display(), "Failed to clear session flag");
        }
    }
}
