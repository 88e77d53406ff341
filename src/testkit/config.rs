//! Canonical test configuration.

use crate::infrastructure::config::Config;

/// Defaults with a 50ms poll interval and a 1s deadline.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.manager.poll_interval_ms = 50;
    config.manager.poll_timeout_ms = 1_000;
    config.manager.client_id = "testkit".into();
    config
}
