//! CLI module graph and command dispatch.

pub mod asset;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod diagnostic;
pub mod output;
pub mod work;

use std::path::Path;

use command::{AssetCommand, Cli, Commands, ConfigCommand};

use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::Config;

/// Run one parsed command against a loaded configuration.
pub async fn execute(cli: &Cli, config: &Config, config_path: &Path, explicit: bool) -> Result<()> {
    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Show => config::execute_show(config),
            ConfigCommand::Validate => config::execute_validate(config_path, explicit),
        };
    }

    let services = build_services(config);
    match &cli.command {
        Commands::Work(args) => work::execute(&services.poller, args, &config.manager.client_id).await,
        Commands::Dashboard => dashboard::execute(&services.aggregator, &services.sources).await,
        Commands::Asset(command) => {
            let provisioner = &services.provisioner;
            match command {
                AssetCommand::Create(args) => asset::execute_create(provisioner, args).await,
                AssetCommand::Update(args) => asset::execute_update(provisioner, args).await,
                AssetCommand::Get(target) => asset::execute_get(provisioner, target).await,
                AssetCommand::List { name } => asset::execute_list(provisioner, name.as_deref()).await,
                AssetCommand::Subresources(target) => {
                    asset::execute_subresources(provisioner, target).await
                }
                AssetCommand::Delete(args) => asset::execute_delete(provisioner, args).await,
            }
        }
        Commands::Config(_) => Ok(()),
    }
}
