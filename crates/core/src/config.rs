//! Application configuration.
//!
//! Values come from built-in defaults, then `<config_dir>/loadout/config.toml`,
//! then `LOADOUT_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"# Loadout builder configuration.
# Every key may also be set through a LOADOUT_<KEY> environment variable.

operators_url = "https://bymykel.github.io/CSGO-API/api/en/agents.json"
skins_url = "https://bymykel.github.io/CSGO-API/api/en/skins.json"
names_url = "https://randomuser.me/api/"
teammate_count = 3
request_timeout_secs = 20
excluded_weapon_prefixes = ["weapon_knifegg"]

# Fixed seed for reproducible prices and teammates.
# rng_seed = 7

# Directory for loadout.log; defaults to ./logs.
# log_dir = "/tmp/loadout-logs"
"#;

/// Runtime settings for the loaders and the terminal app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Agents feed endpoint.
    pub operators_url: String,
    /// Skins feed endpoint.
    pub skins_url: String,
    /// Random-user feed endpoint.
    pub names_url: String,
    /// Number of teammate names requested from the random-user feed.
    pub teammate_count: usize,
    /// Per-request timeout for every feed.
    pub request_timeout_secs: u64,
    /// Weapon id prefixes dropped while indexing skins.
    pub excluded_weapon_prefixes: Vec<String>,
    /// Seed for the session random number generator.
    pub rng_seed: Option<u64>,
    /// Override for the log directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operators_url: "https://bymykel.github.io/CSGO-API/api/en/agents.json".to_string(),
            skins_url: "https://bymykel.github.io/CSGO-API/api/en/skins.json".to_string(),
            names_url: "https://randomuser.me/api/".to_string(),
            teammate_count: 3,
            request_timeout_secs: 20,
            excluded_weapon_prefixes: vec!["weapon_knifegg".to_string()],
            rng_seed: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from the user config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load using `path` as the config file; a missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("LOADOUT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("excluded_weapon_prefixes"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        settings
            .try_deserialize()
            .context("invalid configuration values")
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory holding `loadout.log`.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()
                .context("failed to resolve current directory")?
                .join("logs")),
        }
    }
}

/// Path of the user config file.
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no configuration directory on this platform")?;
    Ok(base.join("loadout").join("config.toml"))
}

/// Write the default config file unless one already exists.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path()?;
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config to {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}
