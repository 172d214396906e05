use std::path::{Path, PathBuf};

use deckhand_core::config::SyncProfile;

use crate::cli::ConfigCommands;
use crate::credentials::KeychainProfile;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(config_path),
        ConfigCommands::Set {
            media_sync,
            shard,
            media_dir,
            remote_media_dir,
        } => run_config_set(config_path, media_sync, shard, media_dir, remote_media_dir),
    }
}

pub fn run_config_show(config_path: &Path) -> Result<(), CliError> {
    let profile = KeychainProfile::load(config_path)?;
    println!("Config file: {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(profile.config())?);
    let status = if profile.sync_key().is_some() {
        "stored"
    } else {
        "not stored"
    };
    println!("Sync key: {status}");
    Ok(())
}

pub fn run_config_set(
    config_path: &Path,
    media_sync: Option<bool>,
    shard: Option<u32>,
    media_dir: Option<PathBuf>,
    remote_media_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut profile = KeychainProfile::load(config_path)?;
    let config = profile.config_mut();

    if let Some(enabled) = media_sync {
        config.media_sync_enabled = enabled;
    }
    if shard.is_some() {
        config.sync_shard = shard;
    }
    if media_dir.is_some() {
        config.media_dir = media_dir;
    }
    if remote_media_dir.is_some() {
        config.remote_media_dir = remote_media_dir;
    }

    profile.save()?;
    println!("Saved {}", config_path.display());
    Ok(())
}
