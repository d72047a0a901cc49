//! Configuration loading from environment variables.

use anyhow::{Context, Result};
use std::path::PathBuf;

use settimana::transport::DEFAULT_BACKEND_URL;

/// Backend location and session credential loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub session_id: String,
    pub state_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `CRUSCOTTO_SESSION_ID` must be set, either in the environment or in a
    /// `.env` file. `CRUSCOTTO_BACKEND_URL` and `CRUSCOTTO_STATE_DIR` are
    /// optional.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let session_id = lookup("CRUSCOTTO_SESSION_ID")
            .filter(|s| !s.is_empty())
            .context("CRUSCOTTO_SESSION_ID environment variable not set")?;

        let backend_url =
            lookup("CRUSCOTTO_BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let state_dir = lookup("CRUSCOTTO_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            backend_url,
            session_id,
            state_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("CRUSCOTTO_SESSION_ID", "abc")])).unwrap();

        assert_eq!(config.session_id, "abc");
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.state_dir, PathBuf::from("."));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CRUSCOTTO_SESSION_ID", "abc"),
            ("CRUSCOTTO_BACKEND_URL", "https://portal.example"),
            ("CRUSCOTTO_STATE_DIR", "/tmp/cruscotto"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "https://portal.example");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/cruscotto"));
    }

    #[test]
    fn test_config_requires_session() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("CRUSCOTTO_SESSION_ID"));
    }

    #[test]
    fn test_config_rejects_empty_session() {
        assert!(Config::from_lookup(lookup(&[("CRUSCOTTO_SESSION_ID", "")])).is_err());
    }
}
