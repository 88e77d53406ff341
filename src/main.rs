use clap::Parser;
use fleetline::adapter::inbound::cli::command::Cli;
use fleetline::adapter::inbound::cli::{self, diagnostic, output};
use fleetline::infrastructure::config::Config;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    let (config_path, explicit) = cli.config_path();
    let loaded = if explicit {
        Config::load(&config_path)
    } else {
        Config::load_or_default(&config_path)
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            match diagnostic::config_report(&config_path, &err) {
                Some(report) => eprintln!("{report:?}"),
                None => output::error(&format!("Failed to load config: {err}")),
            }
            std::process::exit(1);
        }
    };

    match cli.verbose {
        0 if cli.quiet => config.logging.level = "warn".into(),
        0 => {}
        1 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
    config.init_logging();

    tokio::select! {
        result = cli::execute(&cli, &config, &config_path, explicit) => {
            if let Err(err) = result {
                error!(error = %err, status = err.status_code(), "Command failed");
                output::error(&err.to_string());
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted, remote work may still complete");
            std::process::exit(130);
        }
    }
}
