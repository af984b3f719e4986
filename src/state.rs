use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::db::{ContactDb, ContactStore};
use crate::error::CrmError;
use crate::notification::EventHub;
use crate::random::{self, RandomSource};
use crate::types::CrmConfig;

/// Contact store shared by every request handler.
pub type SharedStore = Box<dyn ContactStore + Send>;

/// Process-wide state: config, contact store, random source and event hub.
///
/// The store and the random source sit behind `parking_lot` mutexes so
/// handlers can be called from any thread; each handler holds a lock only
/// for the duration of its own reads or single insert.
pub struct AppState {
    pub config: CrmConfig,
    pub store: Mutex<SharedStore>,
    pub rng: Mutex<Box<dyn RandomSource + Send>>,
    pub hub: EventHub,
}

impl AppState {
    /// State over `store`, drawing randomness per `config.rng_seed`.
    pub fn new(config: CrmConfig, store: SharedStore) -> Self {
        let rng = random::from_seed(config.rng_seed);
        Self::with_rng(config, store, rng)
    }

    pub fn with_rng(
        config: CrmConfig,
        store: SharedStore,
        rng: Box<dyn RandomSource + Send>,
    ) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            rng: Mutex::new(rng),
            hub: EventHub::new(),
        }
    }

    /// Load `~/.crm-assistant/config.json` and open the SQLite store it names.
    pub fn open_default() -> Result<Self, CrmError> {
        let config = load_config()?;
        let db = ContactDb::open(&config)?;
        Ok(Self::new(config, Box::new(db)))
    }
}

/// Get the canonical config file path (`~/.crm-assistant/config.json`).
pub fn config_path() -> Result<PathBuf, CrmError> {
    let home = dirs::home_dir()
        .ok_or_else(|| CrmError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".crm-assistant").join("config.json"))
}

/// Load configuration from the default path. A missing file means defaults.
pub fn load_config() -> Result<CrmConfig, CrmError> {
    load_config_from(&config_path()?)
}

/// Load configuration from `path`. A missing file means defaults.
pub fn load_config_from(path: &Path) -> Result<CrmConfig, CrmError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(CrmConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CrmError::Config(format!("Failed to read config: {}", e)))?;

    let config: CrmConfig = serde_json::from_str(&content)
        .map_err(|e| CrmError::Config(format!("Failed to parse config: {}", e)))?;

    Ok(config)
}
