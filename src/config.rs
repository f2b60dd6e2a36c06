use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming a TOML file that replaces the embedded config.
pub const CONFIG_ENV: &str = "POKEDEX_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub pokemon: PokemonConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PokemonConfig {
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub timeout: u32,
    #[serde(default = "default_name_list_limit")]
    pub name_list_limit: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StorageConfig {
    /// Either "memory" or "file".
    pub r#type: String,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_name_list_limit() -> u32 {
    1025
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".pokedex")
}

impl PokemonConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout))
    }
}

impl Default for PokemonConfig {
    fn default() -> Self {
        Self {
            api_url: "https://pokeapi.co/api/v2".to_string(),
            timeout: 10,
            name_list_limit: default_name_list_limit(),
        }
    }
}

impl StorageConfig {
    pub fn is_file(&self) -> bool {
        self.r#type == "file"
    }
}

impl Config {
    /// Loads the file named by [`CONFIG_ENV`] if set, otherwise the embedded default.
    pub fn load() -> Result<Self, Error> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    tracing::error!("Failed to read config file {}: {}", path, e);
                    Error::Config(format!("{}: {}", path, e))
                })?;
                Self::from_toml_str(&contents)
            }
            Err(_) => Self::from_toml_str(DEFAULT_CONFIG),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents).map_err(|e| {
            tracing::error!("Failed to parse config.toml: {}", e);
            Error::from(e)
        })
    }
}
