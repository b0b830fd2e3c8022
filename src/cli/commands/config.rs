use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use waypoint::WaypointConfig;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the configuration file location
    Path,
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn config_command(path: Option<&Path>, config: &WaypointConfig, args: ConfigCommands) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => WaypointConfig::get_config_path()?,
    };

    match args.command {
        ConfigSubcommands::Path => {
            println!("{}", config_path.display());
        }
        ConfigSubcommands::Show => {
            let marker = if config_path.exists() { "" } else { " (defaults, file missing)" };
            println!(
                "  {} {}{}",
                "Configuration".bright_white().bold(),
                config_path.display().to_string().cyan(),
                marker.bright_yellow()
            );
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigSubcommands::Init { force } => init(config_path, force)?,
    }

    Ok(())
}

fn init(config_path: PathBuf, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!(
            "{} {} already exists, use --force to overwrite",
            "⚠️ ".bright_yellow().bold(),
            config_path.display()
        );
        return Ok(());
    }

    let written = WaypointConfig::default().save(Some(&config_path))?;
    println!("{} Wrote {}", "✓".bright_green().bold(), written.display().to_string().bright_green());
    Ok(())
}
