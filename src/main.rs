use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::Path;

mod cli;

use cli::commands::{config_command, inspect_command, resolve_command};
use cli::{Cli, Commands};
use waypoint::WaypointConfig;

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        // Truncate on each run
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    info!("Starting waypoint");

    let config = WaypointConfig::load(cli.config.as_deref())?;
    debug!("History limit: {:?}", config.navigation.history_limit);

    match cli.command {
        Commands::Resolve(args) => resolve_command(&config, args),
        Commands::Inspect(args) => inspect_command(args),
        Commands::Config(args) => config_command(cli.config.as_deref(), &config, args),
    }
}
