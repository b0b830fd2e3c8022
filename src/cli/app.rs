use super::commands::config::ConfigCommands;
use super::commands::inspect::InspectArgs;
use super::commands::resolve::ResolveArgs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Inspect deep-link routing and persisted navigation state")]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr (truncated on each run)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a URL against the configured registry and show its route
    Resolve(ResolveArgs),
    /// Print a persisted navigation state file as a tree
    Inspect(InspectArgs),
    /// Configuration management
    Config(ConfigCommands),
}
