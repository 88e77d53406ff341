//! Work manager connection and polling settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::work::PollSettings;

fn default_url() -> String {
    "http://localhost:8080".into()
}

const fn default_poll_interval_ms() -> u64 {
    200
}

const fn default_poll_timeout_ms() -> u64 {
    10_000
}

/// `[manager]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManagerConfig {
    /// Base URL of the work manager.
    #[serde(default = "default_url")]
    pub url: String,
    /// Delay between status polls (default: 200).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Overall deadline for submit plus polling (default: 10000).
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Client identifier stamped on every work request.
    #[serde(default)]
    pub client_id: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_ms: default_poll_timeout_ms(),
            client_id: String::new(),
        }
    }
}

impl ManagerConfig {
    #[must_use]
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            deadline: Duration::from_millis(self.poll_timeout_ms),
        }
    }
}
