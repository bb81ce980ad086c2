use std::collections::BTreeMap;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "wgvault";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEYSTORE_FILE_NAME: &str = "keystore.toml";

pub const DEFAULT_REMOTE: &str = "http://localhost:8080";
pub const DEFAULT_USER: &str = "anonymous";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the wireguard-ui server
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Username used in API paths
    #[serde(default = "default_user")]
    pub user: String,
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            user: default_user(),
        }
    }
}

/// On-disk key material, all of it safe to store in plaintext TOML
///
/// The wrapped master key is useless without the passphrase, and every
/// entry in `keys` is an AEAD envelope sealed under the master key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keystore {
    /// Hex of the passphrase-wrapped master key blob
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_key: Option<String>,
    /// Peer public key hex -> sealed private key envelope hex
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the wgvault directory (~/.wgvault)
    pub wgvault_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the keystore file
    pub keystore_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
    /// Loaded keystore
    pub keystore: Keystore,
}

impl AppState {
    /// Get the wgvault directory path (custom or default ~/.wgvault)
    pub fn wgvault_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Check if the wgvault directory exists
    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let wgvault_dir = Self::wgvault_dir(custom_path)?;
        Ok(wgvault_dir.exists())
    }

    /// Initialize a new wgvault state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let wgvault_dir = Self::wgvault_dir(custom_path)?;

        if wgvault_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&wgvault_dir)?;

        let config = config.unwrap_or_default();
        let config_path = wgvault_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        let keystore = Keystore::default();
        let keystore_path = wgvault_dir.join(KEYSTORE_FILE_NAME);
        fs::write(&keystore_path, toml::to_string_pretty(&keystore)?)?;

        Ok(Self {
            wgvault_dir,
            config_path,
            keystore_path,
            config,
            keystore,
        })
    }

    /// Load existing state from the wgvault directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let wgvault_dir = Self::wgvault_dir(custom_path)?;

        if !wgvault_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = wgvault_dir.join(CONFIG_FILE_NAME);
        let keystore_path = wgvault_dir.join(KEYSTORE_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }
        if !keystore_path.exists() {
            return Err(StateError::MissingFile(KEYSTORE_FILE_NAME.to_string()));
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;
        let keystore: Keystore = toml::from_str(&fs::read_to_string(&keystore_path)?)?;

        Ok(Self {
            wgvault_dir,
            config_path,
            keystore_path,
            config,
            keystore,
        })
    }

    /// Write the in-memory keystore back to disk
    pub fn save_keystore(&self) -> Result<(), StateError> {
        fs::write(&self.keystore_path, toml::to_string_pretty(&self.keystore)?)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("wgvault directory not initialized. Run 'wgvault init' first")]
    NotInitialized,

    #[error("wgvault directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_dir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wgvault");
        (dir, path)
    }

    #[test]
    fn test_init_then_load() {
        let (_guard, path) = temp_dir();

        let state = AppState::init(Some(path.clone()), None).unwrap();
        assert_eq!(state.config.remote, DEFAULT_REMOTE);
        assert_eq!(state.config.user, DEFAULT_USER);
        assert!(state.keystore.wrapped_key.is_none());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config.remote, state.config.remote);
        assert!(loaded.keystore.keys.is_empty());
    }

    #[test]
    fn test_double_init_rejected() {
        let (_guard, path) = temp_dir();

        AppState::init(Some(path.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized_rejected() {
        let (_guard, path) = temp_dir();

        assert!(matches!(
            AppState::load(Some(path)),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_keystore_roundtrip() {
        let (_guard, path) = temp_dir();

        let mut state = AppState::init(Some(path.clone()), None).unwrap();
        state.keystore.wrapped_key = Some("aabbccdd".to_string());
        state
            .keystore
            .keys
            .insert("deadbeef".to_string(), "cafe".to_string());
        state.save_keystore().unwrap();

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.keystore.wrapped_key.as_deref(), Some("aabbccdd"));
        assert_eq!(loaded.keystore.keys["deadbeef"], "cafe");
    }
}
