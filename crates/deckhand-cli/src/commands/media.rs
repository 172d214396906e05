use std::path::Path;
use std::sync::Arc;

use deckhand_core::config::{ProfileConfig, SyncProfile};
use deckhand_core::media_sync::{
    media_sync_endpoint, EventStream, FolderMediaBackend, MediaSyncEvent, MediaSyncer,
    StartOutcome,
};

use crate::cli::MediaCommands;
use crate::credentials::KeychainProfile;
use crate::error::CliError;

pub async fn run_media(command: MediaCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        MediaCommands::Sync => run_media_sync(config_path).await,
        MediaCommands::Endpoint => {
            let profile = KeychainProfile::load(config_path)?;
            println!("{}", media_sync_endpoint(profile.sync_shard()));
            Ok(())
        }
        MediaCommands::LogIn { key, shard } => run_log_in(key, shard, config_path),
        MediaCommands::LogOut => run_log_out(config_path),
    }
}

pub fn run_log_in(key: String, shard: Option<u32>, config_path: &Path) -> Result<(), CliError> {
    let mut profile = KeychainProfile::load(config_path)?;
    profile.set_sync_key(Some(key))?;
    if profile.sync_key().is_none() {
        return Err(CliError::NotLoggedIn);
    }
    if shard.is_some() {
        profile.config_mut().sync_shard = shard;
        profile.save()?;
    }
    println!("Sync key stored.");
    Ok(())
}

pub fn run_log_out(config_path: &Path) -> Result<(), CliError> {
    let mut profile = KeychainProfile::load(config_path)?;
    profile.set_sync_key(None)?;
    println!("Sync key removed.");
    Ok(())
}

pub fn folder_backend(config: &ProfileConfig) -> Result<FolderMediaBackend, CliError> {
    match (&config.media_dir, &config.remote_media_dir) {
        (Some(local), Some(remote)) => Ok(FolderMediaBackend::new(local, remote)),
        _ => Err(CliError::MediaFoldersNotConfigured),
    }
}

/// Run one sync in the foreground, printing log entries as they arrive.
///
/// The first Ctrl-C asks the sync to stop at its next checkpoint.
pub async fn run_media_sync(config_path: &Path) -> Result<(), CliError> {
    let profile = KeychainProfile::load(config_path)?;
    let backend = folder_backend(profile.config())?;

    let mut syncer = MediaSyncer::new(profile, Arc::new(backend));
    let mut events = syncer.subscribe();

    match syncer.start()? {
        StartOutcome::Started | StartOutcome::AlreadySyncing => {}
        StartOutcome::NoCredentials => return Err(CliError::NotLoggedIn),
        StartOutcome::Disabled => {
            print_events(&mut events);
            return Err(CliError::MediaSyncDisabled);
        }
    }

    let mut abort_requested = false;
    loop {
        print_events(&mut events);
        tokio::select! {
            running = syncer.process_next() => {
                if !running? {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c(), if !abort_requested => {
                signal?;
                abort_requested = true;
                syncer.abort()?;
            }
        }
    }
    print_events(&mut events);
    Ok(())
}

fn print_events(events: &mut EventStream) {
    while let Ok(event) = events.try_recv() {
        match event {
            MediaSyncEvent::LogAppended(entry) => println!("{}", entry.display_line()),
            MediaSyncEvent::Alert(message) => eprintln!("{message}"),
            MediaSyncEvent::StartedOrStopped(running) => {
                tracing::debug!(running, "Media sync state changed");
            }
        }
    }
}
