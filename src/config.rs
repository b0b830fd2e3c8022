use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::coordinator::CoordinatorOptions;
use crate::deeplink::{DeepLink, DeepLinkHandler, DeepLinkRegistry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WaypointConfig {
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub deep_links: DeepLinkSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NavigationSettings {
    /// Maximum history snapshots per coordinator; unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepLinkSettings {
    #[serde(default = "default_schemes")]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub universal_domains: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_schemes() -> Vec<String> {
    vec!["app".to_string()]
}

impl Default for DeepLinkSettings {
    fn default() -> Self {
        Self {
            schemes: default_schemes(),
            universal_domains: Vec::new(),
            routes: Vec::new(),
        }
    }
}

/// A named route pattern. Handlers are supplied in code and looked up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub pattern: String,
    pub name: String,
    #[serde(default)]
    pub priority: i32,
}

impl WaypointConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("waypoint")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".waypoint")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or the default location. A missing file yields the
    /// default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_toml(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(
            "Loaded config with {} schemes and {} routes",
            config.deep_links.schemes.len(),
            config.deep_links.routes.len()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid waypoint configuration")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Write to `path`, or the default location, creating parent directories
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Saving config to: {:?}", config_path);

        if let Some(dir) = config_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        fs::write(&config_path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(config_path)
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            history_limit: self.navigation.history_limit,
        }
    }

    /// Build a registry from the configured schemes, domains and routes.
    ///
    /// `handler_for_route` is asked for each configured route; routes it returns
    /// `None` for are registered with a handler that only logs the match.
    pub fn build_registry<F>(&self, mut handler_for_route: F) -> DeepLinkRegistry
    where
        F: FnMut(&RouteConfig) -> Option<Arc<dyn DeepLinkHandler>>,
    {
        let mut registry = DeepLinkRegistry::new();
        for scheme in &self.deep_links.schemes {
            registry.register_scheme(scheme);
        }
        for domain in &self.deep_links.universal_domains {
            registry.register_universal_link_domain(domain);
        }
        for route in &self.deep_links.routes {
            match handler_for_route(route) {
                Some(handler) => registry.register_arc(&route.pattern, route.priority, handler),
                None => {
                    let name = route.name.clone();
                    registry.register_with_priority(&route.pattern, route.priority, move |link: &DeepLink| {
                        info!("Route '{}' matched {}", name, link);
                    });
                }
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[navigation]
history_limit = 50

[deep_links]
schemes = ["app", "myapp"]
universal_domains = ["example.com"]

[[deep_links.routes]]
pattern = "profile/*"
name = "profile"

[[deep_links.routes]]
pattern = "*"
name = "fallback"
priority = -1
"#;

    #[test]
    fn test_parse_sample() -> Result<()> {
        let config = WaypointConfig::from_toml(SAMPLE)?;
        assert_eq!(config.navigation.history_limit, Some(50));
        assert_eq!(config.deep_links.schemes, vec!["app", "myapp"]);
        assert_eq!(config.deep_links.routes.len(), 2);
        assert_eq!(config.deep_links.routes[1].priority, -1);
        assert_eq!(config.coordinator_options().history_limit, Some(50));
        Ok(())
    }

    #[test]
    fn test_empty_file_uses_defaults() -> Result<()> {
        let config = WaypointConfig::from_toml("")?;
        assert_eq!(config, WaypointConfig::default());
        assert_eq!(config.deep_links.schemes, vec!["app"]);
        Ok(())
    }

    #[test]
    fn test_build_registry_orders_routes() -> Result<()> {
        let config = WaypointConfig::from_toml(SAMPLE)?;
        let registry = config.build_registry(|_| None);

        assert!(registry.is_valid_url("myapp://anything"));
        assert!(registry.is_valid_url("https://example.com/profile/1"));
        let link = DeepLink::from_path("profile/1");
        assert_eq!(registry.matching_route(&link).map(|p| p.as_str()), Some("profile/*"));
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let path = std::env::temp_dir().join(format!("waypoint-config-{}.toml", std::process::id()));
        let config = WaypointConfig::from_toml(SAMPLE)?;
        config.save(Some(&path))?;
        let loaded = WaypointConfig::load(Some(&path))?;
        fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }
}
