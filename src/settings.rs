//! Process-wide configuration, fixed at startup.

use std::fmt;
use std::time::Duration;
use tracing::warn;

use crate::consts::{DEFAULT_API_KEY, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, default_db_path};

#[derive(Clone)]
pub struct Settings {
    /// Execution service URL.
    pub endpoint: String,
    /// Shared credential sent with every request.
    pub api_key: String,
    pub timeout: Duration,
    /// SQLite path for persisted state; `":memory:"` for none.
    pub db_path: String,
}

impl Settings {
    pub fn uses_default_endpoint(&self) -> bool {
        self.endpoint == DEFAULT_ENDPOINT
    }

    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    pub fn is_ephemeral(&self) -> bool {
        self.db_path == ":memory:"
    }

    /// Log a warning for each development-only default still in effect.
    pub fn warn_if_insecure(&self) {
        if self.uses_default_endpoint() {
            warn!(endpoint = %self.endpoint, "using the local development endpoint");
        }
        if self.uses_default_key() {
            warn!("using the default shared key; set CODEPAD_API_KEY for a real deployment");
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            db_path: default_db_path().to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .field("db_path", &self.db_path)
            .finish()
    }
}
