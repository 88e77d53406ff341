//! Configuration loading from disk.

mod support;

use std::time::Duration;

use fleetline::error::{ConfigError, Error};
use fleetline::infrastructure::config::Config;

#[test]
fn full_file_is_loaded() {
    let (_dir, path) = support::write_config(
        r#"
[manager]
url = "http://manager.internal:8080"
poll_interval_ms = 100
poll_timeout_ms = 4000
client_id = "ops-console"

[kube]
url = "https://api.internal:6443"
asset_group = "inventory.example.io/v1"
request_timeout_ms = 5000

[dashboard]
query_timeout_ms = 3000

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(&path).expect("config loads");

    assert_eq!(config.manager.client_id, "ops-console");
    let poll = config.manager.poll_settings();
    assert_eq!(poll.interval, Duration::from_millis(100));
    assert_eq!(poll.deadline, Duration::from_millis(4000));
    assert_eq!(config.kube.request_timeout(), Duration::from_millis(5000));
    assert_eq!(
        config.kube.paths().asset("lab", "node-1"),
        "/apis/inventory.example.io/v1/namespaces/lab/baremetalassets/node-1"
    );
    assert_eq!(config.dashboard_timeout(), Duration::from_millis(3000));
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = Config::load_or_default(dir.path().join("fleetline.toml")).expect("defaults");
    assert_eq!(config.manager.poll_settings().interval, Duration::from_millis(200));
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_url_is_rejected() {
    let (_dir, path) = support::write_config("[kube]\nurl = \"not a url\"\n");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { field: "kube.url", .. })
    ));
}

#[test]
fn empty_asset_group_is_rejected() {
    let (_dir, path) = support::write_config("[kube]\nasset_group = \"\"\n");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField { field: "kube.asset_group" })
    ));
}

#[test]
fn zero_dashboard_timeout_is_rejected() {
    let (_dir, path) = support::write_config("[dashboard]\nquery_timeout_ms = 0\n");
    assert!(Config::load(&path).is_err());
}

#[test]
fn syntax_errors_keep_the_toml_span() {
    let (_dir, path) = support::write_config("[manager]\npoll_interval_ms = \"fast\"\n");
    let err = Config::load(&path).unwrap_err();
    match err {
        Error::Config(ConfigError::Parse(parse)) => assert!(parse.span().is_some()),
        other => panic!("expected parse error, got {other}"),
    }
}
