use std::{fs, path::PathBuf};

use common::crypto::Pkcs8Document;
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "seedkey";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL used when building share links
    #[serde(default = "default_share_base_url")]
    pub share_base_url: Url,
}

fn default_share_base_url() -> Url {
    Url::parse("https://seedkey.example/open").expect("default share URL is valid")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the seedkey directory (~/.seedkey)
    pub seedkey_dir: PathBuf,
    /// Path to the cached key container PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the seedkey directory path (custom or default ~/.seedkey)
    pub fn seedkey_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new seedkey state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let seedkey_dir = Self::seedkey_dir(custom_path)?;

        if seedkey_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&seedkey_dir)?;

        let config = config.unwrap_or_default();
        let config_path = seedkey_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // No key yet: key.pem appears once a key pair has been derived
        let key_path = seedkey_dir.join(KEY_FILE_NAME);

        Ok(Self {
            seedkey_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the seedkey directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let seedkey_dir = Self::seedkey_dir(custom_path)?;

        if !seedkey_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = seedkey_dir.join(KEY_FILE_NAME);
        let config_path = seedkey_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            seedkey_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the cached key container, if one has been derived
    pub fn load_document(&self) -> Result<Option<Pkcs8Document>, StateError> {
        if !self.key_path.exists() {
            return Ok(None);
        }
        let pem = fs::read_to_string(&self.key_path)?;
        let document = Pkcs8Document::from_pem(&pem)
            .map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(Some(document))
    }

    /// Persist a key container for reuse in later invocations
    pub fn save_document(&self, document: &Pkcs8Document) -> Result<(), StateError> {
        fs::write(&self.key_path, document.to_pem())?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("seedkey directory not initialized. Run 'seedkey init' first")]
    NotInitialized,

    #[error("seedkey directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key container: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
