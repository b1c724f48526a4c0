use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint and notification settings of the calendar client.
///
/// With an empty `origin` every URL is relative, which is what the browser
/// build wants. Native callers set it with [`ClientConfig::with_origin`] or
/// [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port prefixed to both paths
    #[serde(default)]
    pub origin: String,

    /// Path tried first for every request
    #[serde(default = "default_primary_path")]
    pub primary_path: String,

    /// Path retried once when the primary is unreachable
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,

    /// How long notifications stay on screen (milliseconds)
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u64,
}

fn default_primary_path() -> String {
    "/appointments/api".to_string()
}

fn default_fallback_path() -> String {
    "/api/appointments".to_string()
}

fn default_notification_timeout_ms() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            primary_path: default_primary_path(),
            fallback_path: default_fallback_path(),
            notification_timeout_ms: default_notification_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Point both endpoints at `origin` (e.g. `http://localhost:5000`)
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    pub fn primary_url(&self, path: &str) -> String {
        self.join(&self.primary_path, path)
    }

    pub fn fallback_url(&self, path: &str) -> String {
        self.join(&self.fallback_path, path)
    }

    fn join(&self, base: &str, path: &str) -> String {
        format!(
            "{}{}{}",
            self.origin.trim_end_matches('/'),
            base.trim_end_matches('/'),
            path
        )
    }

    #[cfg(feature = "native")]
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;
        use std::env;

        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            origin: String::new(),
            primary_path: env::var("APPOINTMENTS_PRIMARY_PATH").unwrap_or(defaults.primary_path),
            fallback_path: env::var("APPOINTMENTS_FALLBACK_PATH")
                .unwrap_or(defaults.fallback_path),
            notification_timeout_ms: env::var("NOTIFICATION_TIMEOUT_MS")
                .unwrap_or_else(|_| defaults.notification_timeout_ms.to_string())
                .parse()
                .context("NOTIFICATION_TIMEOUT_MS must be a valid number")?,
        };

        Ok(match env::var("APPOINTMENTS_ORIGIN") {
            Ok(origin) => config.with_origin(&origin),
            Err(_) => config,
        })
    }
}
