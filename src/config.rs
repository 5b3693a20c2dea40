use crate::api::client::ClientConfig;
use crate::api::constants::DEFAULT_AUTH_PLUGIN;
use crate::api::resilience::ResilienceConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod connections;
pub mod storage;

pub use connections::{ConnectionRepository, StoredConnection};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

const APP_DIR: &str = "icat-admin";
const CONFIG_FILE: &str = "config.toml";
const CONNECTIONS_FILE: &str = "connections.toml";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Rows per tab page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Seconds between session refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_bulk_chunk_size")]
    pub bulk_chunk_size: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_plugin")]
    pub default_plugin: String,
}

fn default_page_size() -> u32 {
    50
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_bulk_chunk_size() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_plugin() -> String {
    DEFAULT_AUTH_PLUGIN.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_interval_secs: default_refresh_interval(),
            bulk_chunk_size: default_bulk_chunk_size(),
            request_timeout_secs: default_request_timeout(),
            default_plugin: default_plugin(),
        }
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            resilience: ResilienceConfig::builder()
                .chunk_size(self.bulk_chunk_size)
                .build(),
        }
    }
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join(CONFIG_FILE))
    }

    pub fn get_connections_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join(CONNECTIONS_FILE))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}
