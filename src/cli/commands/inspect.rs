use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::info;
use std::fs;
use std::path::PathBuf;
use waypoint::{PersistedScreen, PersistedState};

#[derive(Args)]
pub struct InspectArgs {
    /// Persisted navigation state (JSON)
    pub file: PathBuf,

    /// Re-emit the decoded state as pretty JSON
    #[arg(long)]
    pub json: bool,
}

pub fn inspect_command(args: InspectArgs) -> Result<()> {
    info!("Inspecting persisted state: {:?}", args.file);

    let content =
        fs::read_to_string(&args.file).with_context(|| format!("Failed to read state file: {:?}", args.file))?;
    let state = PersistedState::decode(&content)?;

    if args.json {
        println!("{}", state.encode_pretty()?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        "Navigation state".bright_white().bold(),
        format!("({} screens)", state.screen_count()).dimmed()
    );
    print_state(&state, 1);
    println!();
    Ok(())
}

fn print_state(state: &PersistedState, depth: usize) {
    let indent = "  ".repeat(depth + 1);

    if state.stack.is_empty() && state.children.is_empty() {
        println!("{}{}", indent, "(empty stack)".dimmed());
    }
    for (position, screen) in state.stack.iter().enumerate() {
        println!("{}{} {}", indent, format!("{}.", position).dimmed(), describe(screen));
    }
    if let Some(sheet) = &state.sheet {
        println!("{}{} {}", indent, "sheet".bright_yellow(), describe(sheet));
    }
    if let Some(full_screen) = &state.full_screen {
        println!("{}{} {}", indent, "full screen".bright_yellow(), describe(full_screen));
    }
    for modal in &state.modals {
        let lock = if modal.dismissible { "" } else { " (pinned)" };
        println!(
            "{}{} {} {:?}{}",
            indent,
            format!("modal:{}", modal.style).magenta(),
            describe(&modal.screen),
            modal.transition,
            lock.dimmed()
        );
    }

    for (tab, child) in &state.children {
        let selected = state.selected_tab.as_deref() == Some(tab.as_str());
        let (marker, name) = if selected {
            ("●", tab.bright_green().bold())
        } else {
            ("○", tab.white())
        };
        println!("{}{} {}", indent, marker.bright_green(), name);
        print_state(child, depth + 1);
    }
}

fn describe(screen: &PersistedScreen) -> String {
    format!("{} {}", screen.identifier.cyan(), screen.payload.to_string().dimmed())
}
