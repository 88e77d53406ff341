//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::{Config, TOKEN_ENV};

/// Execute `config show`.
pub fn execute_show(config: &Config) -> Result<()> {
    if output::is_json() {
        output::result("config", config);
        return Ok(());
    }

    output::section("Manager");
    output::field("URL", &config.manager.url);
    output::field("Poll interval", format!("{}ms", config.manager.poll_interval_ms));
    output::field("Deadline", format!("{}ms", config.manager.poll_timeout_ms));
    if !config.manager.client_id.is_empty() {
        output::field("Client ID", &config.manager.client_id);
    }

    output::section("Resource API");
    output::field("URL", &config.kube.url);
    output::field("Asset group", &config.kube.asset_group);
    output::field("Timeout", format!("{}ms", config.kube.request_timeout_ms));

    output::section("Dashboard");
    output::field(
        "Query timeout",
        format!("{}ms", config.dashboard_timeout().as_millis()),
    );

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    output::section("Credentials");
    if config.token.is_some() {
        output::success(&format!("Token loaded from {TOKEN_ENV}"));
    } else {
        output::warning(&format!("{TOKEN_ENV} not set, requests are unauthenticated"));
    }
    Ok(())
}

/// Execute `config validate`. Loading already validated the file.
pub fn execute_validate(path: &Path, explicit: bool) -> Result<()> {
    if explicit || path.exists() {
        output::success(&format!("{} is valid", path.display()));
    } else {
        output::success("No config file found, defaults are valid");
    }
    Ok(())
}
