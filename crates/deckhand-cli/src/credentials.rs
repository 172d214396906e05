//! Sync key persistence in the system keychain, and the CLI's media sync
//! profile built on top of it.

#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use deckhand_core::config::{ProfileConfig, SyncProfile};
use deckhand_core::util::normalize_text_option;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "deckhand-cli";

#[derive(Debug, Clone)]
pub struct SyncKeyStore {
    username: String,
}

impl SyncKeyStore {
    /// One keychain entry per profile config file
    pub fn for_config(config_path: &Path) -> Self {
        Self {
            username: format!("sync_key:{}", config_path.display()),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Keychain(error.to_string()))
    }

    #[cfg(not(test))]
    pub fn load(&self) -> Result<Option<String>, CliError> {
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Keychain(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn load(&self) -> Result<Option<String>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Keychain(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    pub fn save(&self, key: &str) -> Result<(), CliError> {
        self.entry()?
            .set_password(key)
            .map_err(|error| CliError::Keychain(error.to_string()))
    }

    #[cfg(test)]
    pub fn save(&self, key: &str) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Keychain(error.to_string()))?;
        guard.insert(self.username.clone(), key.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    pub fn clear(&self) -> Result<(), CliError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Keychain(error.to_string())),
        }
    }

    #[cfg(test)]
    pub fn clear(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Keychain(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Profile config from disk plus the sync key from the keychain
#[derive(Debug)]
pub struct KeychainProfile {
    config: ProfileConfig,
    config_path: PathBuf,
    keys: SyncKeyStore,
}

impl KeychainProfile {
    pub fn load(config_path: &Path) -> Result<Self, CliError> {
        let config = ProfileConfig::load_from_path(config_path)?;
        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            keys: SyncKeyStore::for_config(config_path),
        })
    }

    pub const fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ProfileConfig {
        &mut self.config
    }

    pub fn save(&self) -> Result<(), CliError> {
        Ok(self.config.save_to_path(&self.config_path)?)
    }
}

impl SyncProfile for KeychainProfile {
    fn sync_key(&self) -> Option<String> {
        match self.keys.load() {
            Ok(key) => normalize_text_option(key),
            Err(error) => {
                tracing::warn!(%error, "Failed to read sync key from keychain");
                None
            }
        }
    }

    fn set_sync_key(&mut self, key: Option<String>) -> deckhand_core::Result<()> {
        let result = match normalize_text_option(key) {
            Some(key) => self.keys.save(&key),
            None => self.keys.clear(),
        };
        result.map_err(|error| deckhand_core::Error::Config(error.to_string()))
    }

    fn media_syncing_enabled(&self) -> bool {
        self.config.media_sync_enabled
    }

    fn sync_shard(&self) -> Option<u32> {
        self.config.sync_shard
    }
}
