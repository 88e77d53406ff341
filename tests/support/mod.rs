#![allow(dead_code)]

pub mod architecture;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fleetline::application::provisioning::{AssetProvisioner, ResourcePaths};
use fleetline::application::work::{PollSettings, WorkPoller};
use fleetline::port::{ResourceApi, WorkManager};
use tempfile::TempDir;

pub fn poller(manager: Arc<dyn WorkManager>, interval_ms: u64, deadline_ms: u64) -> WorkPoller {
    WorkPoller::new(
        manager,
        PollSettings {
            interval: Duration::from_millis(interval_ms),
            deadline: Duration::from_millis(deadline_ms),
        },
    )
}

pub fn provisioner(api: Arc<dyn ResourceApi>) -> AssetProvisioner {
    AssetProvisioner::new(api, ResourcePaths::default())
}

/// Write `contents` to `fleetline.toml` in a fresh temp dir.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("fleetline.toml");
    std::fs::write(&path, contents).expect("write temp config");
    (dir, path)
}
