//! Resource API connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::provisioning::{ResourcePaths, DEFAULT_ASSET_GROUP};

fn default_url() -> String {
    "https://localhost:6443".into()
}

fn default_asset_group() -> String {
    DEFAULT_ASSET_GROUP.into()
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

/// `[kube]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KubeConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// API group/version serving bare metal assets.
    #[serde(default = "default_asset_group")]
    pub asset_group: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            asset_group: default_asset_group(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl KubeConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn paths(&self) -> ResourcePaths {
        ResourcePaths::new(self.asset_group.clone())
    }
}
