//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::config::DEFAULT_CONFIG_PATH;

/// Control-plane client for a fleet of remote clusters
#[derive(Parser, Debug)]
#[command(name = "fleetline")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config path and whether it was given explicitly.
    #[must_use]
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a work item and wait for its results
    Work(WorkArgs),

    /// Show the fleet health overview
    Dashboard,

    /// Manage bare metal assets
    #[command(subcommand)]
    Asset(AssetCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct WorkArgs {
    /// Resource type to query (e.g. pods, releases)
    pub resource: String,

    /// Restrict to a cluster (repeatable)
    #[arg(long = "cluster")]
    pub clusters: Vec<String>,

    /// Restrict to clusters carrying a label, as key=value (repeatable)
    #[arg(long = "label", value_parser = parse_label)]
    pub labels: Vec<String>,

    /// Operation verb
    #[arg(long, default_value = "get")]
    pub operation: String,

    /// Ask the manager not to apply changes
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_label(raw: &str) -> Result<String, String> {
    match raw.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(raw.to_string()),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    /// Create an asset and its credential secret
    Create(AssetArgs),
    /// Update an asset's BMC address, boot MAC and credentials
    Update(AssetArgs),
    /// Show one asset with decoded credentials
    Get(AssetTarget),
    /// List assets
    List {
        /// Only assets with this name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the namespaces and one asset
    Subresources(AssetTarget),
    /// Delete assets in batches
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AssetTarget {
    /// Asset namespace
    #[arg(short, long)]
    pub namespace: String,
    /// Asset name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct AssetArgs {
    #[command(flatten)]
    pub target: AssetTarget,
    /// BMC address
    #[arg(long)]
    pub bmc_address: String,
    /// BMC username
    #[arg(long)]
    pub username: String,
    /// BMC password
    #[arg(long)]
    pub password: String,
    /// Boot NIC MAC address
    #[arg(long)]
    pub boot_mac: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Targets as namespace/name
    pub targets: Vec<String>,
    /// JSON file holding a list of {namespace, name}
    #[arg(long, conflicts_with = "targets")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied
    Show,
    /// Validate the configuration file
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn work_flags_parse() {
        let cli = Cli::parse_from([
            "fleetline", "work", "pods", "--cluster", "east", "--label", "env=prod", "--json",
        ]);
        assert!(cli.json);
        let Commands::Work(args) = cli.command else {
            panic!("expected work command");
        };
        assert_eq!(args.clusters, vec!["east"]);
        assert_eq!(args.labels, vec!["env=prod"]);
        assert_eq!(args.operation, "get");
    }

    #[test]
    fn label_without_key_is_rejected() {
        assert!(parse_label("=x").is_err());
        assert!(parse_label("plain").is_err());
    }
}
