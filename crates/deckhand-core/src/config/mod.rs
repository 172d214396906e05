//! Profile configuration for media sync.
//!
//! A profile decides whether media sync may run, which server shard it
//! talks to, and which folders the folder-mirror backend uses.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

const PROFILE_CONFIG_VERSION: u32 = 1;

/// Settings and credentials the media sync controller reads.
pub trait SyncProfile {
    /// Stored sync key, if the user has logged in
    fn sync_key(&self) -> Option<String>;

    /// Replace or clear the stored sync key
    fn set_sync_key(&mut self, key: Option<String>) -> Result<()>;

    fn media_syncing_enabled(&self) -> bool;

    /// Server shard assigned at login, if any
    fn sync_shard(&self) -> Option<u32>;
}

/// Persistent profile settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Only populated for in-memory profiles; the CLI keeps it in the keychain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_key: Option<String>,
    #[serde(default = "default_media_sync_enabled")]
    pub media_sync_enabled: bool,
    #[serde(default)]
    pub sync_shard: Option<u32>,
    /// Local media folder
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
    /// Folder the local media folder is mirrored with
    #[serde(default)]
    pub remote_media_dir: Option<PathBuf>,
}

const fn default_config_version() -> u32 {
    PROFILE_CONFIG_VERSION
}

const fn default_media_sync_enabled() -> bool {
    true
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            version: PROFILE_CONFIG_VERSION,
            sync_key: None,
            media_sync_enabled: true,
            sync_shard: None,
            media_dir: None,
            remote_media_dir: None,
        }
    }
}

impl ProfileConfig {
    /// Load a profile, returning defaults when the file does not exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("Failed to read config at {}: {}", path.display(), error))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!("Failed to parse config at {}: {}", path.display(), error))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            Error::Config(format!("Failed to write config at {}: {}", path.display(), error))
        })
    }

    /// Builder-style helper for tests and embedders
    #[must_use]
    pub fn with_sync_key(mut self, key: impl Into<String>) -> Self {
        self.sync_key = normalize_text_option(Some(key.into()));
        self
    }

    fn normalize(&mut self) {
        self.sync_key = normalize_text_option(self.sync_key.take());
        self.media_dir = normalize_path_option(self.media_dir.take());
        self.remote_media_dir = normalize_path_option(self.remote_media_dir.take());
    }
}

impl SyncProfile for ProfileConfig {
    fn sync_key(&self) -> Option<String> {
        self.sync_key.clone()
    }

    fn set_sync_key(&mut self, key: Option<String>) -> Result<()> {
        self.sync_key = normalize_text_option(key);
        Ok(())
    }

    fn media_syncing_enabled(&self) -> bool {
        self.media_sync_enabled
    }

    fn sync_shard(&self) -> Option<u32> {
        self.sync_shard
    }
}

fn normalize_path_option(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path?;
    normalize_text_option(Some(path.to_string_lossy().into_owned())).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempdir().unwrap();
        let config = ProfileConfig::load_from_path(&tmp.path().join("missing.json")).unwrap();
        assert_eq!(config, ProfileConfig::default());
        assert!(config.media_syncing_enabled());
    }

    #[test]
    fn config_roundtrip_normalizes_values() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("profile.json");

        let config = ProfileConfig {
            sync_shard: Some(3),
            media_dir: Some(PathBuf::from(" /tmp/media ")),
            remote_media_dir: Some(PathBuf::from("  ")),
            ..ProfileConfig::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = ProfileConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.sync_shard, Some(3));
        assert_eq!(loaded.media_dir, Some(PathBuf::from("/tmp/media")));
        assert_eq!(loaded.remote_media_dir, None);
    }

    #[test]
    fn partial_file_uses_field_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("profile.json");
        std::fs::write(&path, r#"{ "sync_shard": 2 }"#).unwrap();

        let loaded = ProfileConfig::load_from_path(&path).unwrap();
        assert!(loaded.media_sync_enabled);
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.sync_shard, Some(2));
    }

    #[test]
    fn invalid_file_reports_path() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("profile.json");
        std::fs::write(&path, "not json").unwrap();

        let error = ProfileConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn set_sync_key_trims_and_clears() {
        let mut config = ProfileConfig::default().with_sync_key(" key ");
        assert_eq!(config.sync_key().as_deref(), Some("key"));
        config.set_sync_key(Some("   ".to_string())).unwrap();
        assert_eq!(config.sync_key(), None);
    }
}
