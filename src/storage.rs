use crate::config::StorageConfig;
use crate::error::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

pub const FAVORITES_KEY: &str = "pokemon_favorites";
pub const TEAM_KEY: &str = "pokemon_team";
pub const GAME_SCORES_KEY: &str = "pokemon_game_scores";
pub const THEME_KEY: &str = "pokemon-theme";

// Key-value persistence shared by the roster collections
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: &Value) -> Result<(), Error>;
}

/// Reads `key` as `T`, falling back to `T::default()` when the key is absent
/// or holds something that does not deserialize.
pub fn load_or_default<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = storage.get(key) else {
        tracing::debug!("No stored value for key: {}", key);
        return T::default();
    };
    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Discarding unreadable value for key {}: {}", key, e);
            T::default()
        }
    }
}

/// Serializes and writes `value`. Failures are logged and dropped.
pub fn save<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    let result = serde_json::to_value(value)
        .map_err(Error::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        tracing::error!("Failed to persist key {}: {}", key, e);
    }
}

pub fn from_config(config: &StorageConfig) -> Arc<dyn Storage> {
    if config.is_file() {
        tracing::info!("Using file storage at {}", config.path.display());
        Arc::new(FileStorage::new(&config.path))
    } else {
        tracing::info!("Using in-memory storage");
        Arc::new(MemoryStorage::default())
    }
}

/// Values held for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Value>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<Value> {
        // A poisoned lock still holds a complete map.
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let value = values.get(key).cloned();
        tracing::debug!("Memory storage {} for key: {}", if value.is_some() { "hit" } else { "miss" }, key);
        value
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Error> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());
        tracing::debug!("Memory storage set key: {}", key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory. The directory is
/// created on first write.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Storage miss for key: {}", key);
                return None;
            }
            Err(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Invalid JSON in {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            tracing::error!("Failed to create storage directory {}: {}", self.dir.display(), e);
            Error::from(e)
        })?;
        let path = self.path_for(key);
        let contents = serde_json::to_string(value)?;
        std::fs::write(&path, contents).map_err(|e| {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            Error::from(e)
        })?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
