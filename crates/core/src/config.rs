//! Application configuration.
//!
//! Defaults cover a working setup out of the box; a TOML file under the
//! user config directory overrides individual fields. `ensure_default_config`
//! writes that file on first run so users have something to edit.

use std::{
    fs,
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use config::Config;
use serde::{Deserialize, Serialize};

use crate::filter::FilterRules;

/// Wiki page holding the rotation cycles table.
pub const DEFAULT_CYCLES_URL: &str = "https://wiki.guildwars.com/wiki/Zaishen_Vanquish/cycles";
/// Relay used as the fallback retrieval route for the cycles page.
pub const DEFAULT_RELAY_PREFIX: &str = "https://api.allorigins.win/raw?url=";

/// User-tunable settings, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the foe dataset JSON document.
    pub dataset_path: PathBuf,
    /// Optional URL to fetch the dataset from instead of the local file.
    pub dataset_url: Option<String>,
    /// Whether the featured-vanquish lookup runs at startup.
    pub featured_enabled: bool,
    /// Rotation cycles page URL.
    pub cycles_url: String,
    /// Relay prefix for the second retrieval route; `None` disables it.
    pub relay_prefix: Option<String>,
    /// Per-route timeout for the featured lookup, in seconds.
    pub featured_timeout_secs: u64,
    /// Replacement for the built-in pseudo-skill block-list, when set.
    pub skill_blocklist: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("foe-data.json"),
            dataset_url: None,
            featured_enabled: true,
            cycles_url: DEFAULT_CYCLES_URL.to_string(),
            relay_prefix: Some(DEFAULT_RELAY_PREFIX.to_string()),
            featured_timeout_secs: 8,
            skill_blocklist: None,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults overlaid with the user config file when
    /// one exists.
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file_path() {
            if path.exists() {
                builder = builder.add_source(config::File::from(path));
            }
        }
        let raw = builder.build().context("failed to read configuration")?;
        let config: AppConfig = raw
            .try_deserialize()
            .context("failed to parse configuration")?;
        Ok(config)
    }

    /// Retrieval routes for the cycles page, primary first. At most two.
    pub fn featured_routes(&self) -> Vec<String> {
        let mut routes = vec![self.cycles_url.clone()];
        if let Some(prefix) = self.relay_prefix.as_deref() {
            routes.push(format!("{prefix}{}", percent_encode(&self.cycles_url)));
        }
        routes
    }

    /// Per-route timeout for the featured lookup.
    pub fn featured_timeout(&self) -> Duration {
        Duration::from_secs(self.featured_timeout_secs)
    }

    /// Skill cleanup rules: the configured block-list when set, otherwise
    /// the built-in snapshot.
    pub fn filter_rules(&self) -> FilterRules {
        match &self.skill_blocklist {
            Some(blocklist) => FilterRules::with_blocklist(blocklist.clone()),
            None => FilterRules::default(),
        }
    }
}

/// Directory holding the config file and persisted preferences.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vqtui"))
}

fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Write the default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let Some(path) = config_file_path() else {
        return Ok(());
    };
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized =
        toml::to_string_pretty(&AppConfig::default()).context("failed to serialize defaults")?;
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

/// Percent-encode a string for use inside a query parameter.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();
        assert!(config.featured_enabled);
        assert_eq!(config.featured_timeout(), Duration::from_secs(8));
        assert_eq!(config.dataset_path, PathBuf::from("foe-data.json"));
        assert!(config.skill_blocklist.is_none());
    }

    #[test]
    fn featured_routes_are_primary_then_relay() {
        let config = AppConfig::default();
        let routes = config.featured_routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0], DEFAULT_CYCLES_URL);
        assert!(routes[1].starts_with(DEFAULT_RELAY_PREFIX));
        assert!(routes[1].contains("https%3A%2F%2Fwiki.guildwars.com"));
    }

    #[test]
    fn disabled_relay_leaves_one_route() {
        let config = AppConfig {
            relay_prefix: None,
            ..AppConfig::default()
        };
        assert_eq!(config.featured_routes().len(), 1);
    }

    #[test]
    fn blocklist_override_feeds_filter_rules() {
        let config = AppConfig {
            skill_blocklist: Some(vec!["Ghosts".to_string()]),
            ..AppConfig::default()
        };
        assert_eq!(config.filter_rules().blocklist, vec!["Ghosts"]);
        assert!(AppConfig::default().filter_rules().blocklist.len() > 1);
    }

    #[test]
    fn default_config_roundtrips_through_toml() {
        let serialized = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.cycles_url, DEFAULT_CYCLES_URL);
        assert_eq!(parsed.featured_timeout_secs, 8);
    }
}
