use anyhow::Result;
use clap::Args;
use colored::*;
use log::info;
use waypoint::{DeepLink, Locator, WaypointConfig};

#[derive(Args)]
pub struct ResolveArgs {
    /// URL to resolve, e.g. app://host/profile/7?tab=posts
    pub url: String,

    /// Run the matching route's handler as well
    #[arg(short, long)]
    pub dispatch: bool,

    /// Print the parsed deep link as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate a URL against the configured registry and report the route it
/// would be dispatched to
pub fn resolve_command(config: &WaypointConfig, args: ResolveArgs) -> Result<()> {
    info!("Resolving deep link: {}", args.url);
    let registry = config.build_registry(|_| None);

    let locator = Locator::parse(&args.url)?;
    if !registry.is_valid(&locator) {
        println!("{} '{}' is not accepted", "✗".bright_red().bold(), args.url.bright_red());
        let schemes: Vec<&str> = registry.schemes().collect();
        let domains: Vec<&str> = registry.universal_domains().collect();
        println!("  {} {}", "schemes:".dimmed(), schemes.join(", "));
        if !domains.is_empty() {
            println!("  {} {}", "domains:".dimmed(), domains.join(", "));
        }
        anyhow::bail!("Deep link rejected: scheme '{}' and host are not registered", locator.scheme);
    }

    let link = DeepLink::from_locator(&locator);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&link)?);
        return Ok(());
    }

    println!("{} {}", "✓".bright_green().bold(), link.to_string().bright_green().bold());
    println!("  {} {}", "scheme:".dimmed(), locator.scheme.cyan());
    if let Some(host) = &locator.host {
        println!("  {} {}", "host:".dimmed(), host.cyan());
    }
    println!("  {} {}", "components:".dimmed(), format!("{:?}", link.components()).white());
    for (key, value) in link.parameters() {
        println!("  {} {} = {}", "param:".dimmed(), key.bright_yellow(), value);
    }

    match registry.matching_route(&link) {
        Some(pattern) => println!("  {} {}", "route:".dimmed(), pattern.as_str().bright_white().bold()),
        None => println!("  {}", "⚠️  No route matches this path".bright_yellow().bold()),
    }

    if args.dispatch && !registry.dispatch(&link) {
        anyhow::bail!("No handler accepted {}", link);
    }

    Ok(())
}
