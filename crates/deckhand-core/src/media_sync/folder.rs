//! Media sync against a plain directory.
//!
//! The remote side is any mounted folder (network share, synced drive).
//! A manifest in the local media folder remembers which files both sides
//! held after the last successful run, so a file missing on one side can be
//! told apart as deleted rather than new.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::backend::{
    MediaSyncBackend, MediaSyncError, MediaSyncProgress, NetworkErrorKind, SyncErrorKind,
};

const MANIFEST_FILE: &str = ".deckhand-media.json";

#[derive(Debug, Clone)]
pub struct FolderMediaBackend {
    local: PathBuf,
    remote: PathBuf,
}

impl FolderMediaBackend {
    pub fn new(local: impl Into<PathBuf>, remote: impl Into<PathBuf>) -> Self {
        Self {
            local: local.into(),
            remote: remote.into(),
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.local.join(MANIFEST_FILE)
    }

    fn load_manifest(&self) -> Result<BTreeSet<String>, MediaSyncError> {
        let path = self.manifest_path();
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|error| {
                MediaSyncError::Database(format!("{}: {error}", path.display()))
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(BTreeSet::new()),
            Err(error) => Err(local_error(&path, &error)),
        }
    }

    fn save_manifest(&self, names: &BTreeSet<String>) -> Result<(), MediaSyncError> {
        let path = self.manifest_path();
        let raw = serde_json::to_string_pretty(names)
            .map_err(|error| MediaSyncError::Database(error.to_string()))?;
        fs::write(&path, raw).map_err(|error| local_error(&path, &error))
    }
}

impl MediaSyncBackend for FolderMediaBackend {
    fn run_media_sync(
        &self,
        sync_key: &str,
        endpoint: &str,
        progress: &mut dyn FnMut(MediaSyncProgress) -> bool,
    ) -> Result<(), MediaSyncError> {
        if sync_key.trim().is_empty() {
            return Err(MediaSyncError::sync(
                SyncErrorKind::AuthFailed,
                "sync key was rejected",
            ));
        }
        if !self.remote.is_dir() {
            return Err(MediaSyncError::network(
                NetworkErrorKind::Offline,
                format!("{} is not reachable", self.remote.display()),
            ));
        }
        fs::create_dir_all(&self.local).map_err(|error| local_error(&self.local, &error))?;

        tracing::debug!(
            local = %self.local.display(),
            remote = %self.remote.display(),
            endpoint,
            "Mirroring media folder"
        );

        let local = list_media(&self.local).map_err(|error| local_error(&self.local, &error))?;
        let remote =
            list_media(&self.remote).map_err(|error| remote_error(&self.remote, &error))?;
        let previous = self.load_manifest()?;

        let mut state = MediaSyncProgress::default();
        let mut synced = BTreeSet::new();

        for name in local.union(&remote) {
            let local_path = self.local.join(name);
            let remote_path = self.remote.join(name);

            match (local.contains(name), remote.contains(name)) {
                (true, true) => {
                    synced.insert(name.clone());
                }
                (true, false) if previous.contains(name) => {
                    fs::remove_file(&local_path)
                        .map_err(|error| local_error(&local_path, &error))?;
                    state.downloaded_deletions += 1;
                }
                (true, false) => {
                    fs::copy(&local_path, &remote_path)
                        .map_err(|error| remote_error(&remote_path, &error))?;
                    synced.insert(name.clone());
                    state.uploaded_files += 1;
                }
                (false, true) if previous.contains(name) => {
                    fs::remove_file(&remote_path)
                        .map_err(|error| remote_error(&remote_path, &error))?;
                    state.uploaded_deletions += 1;
                }
                (false, true) => {
                    fs::copy(&remote_path, &local_path)
                        .map_err(|error| local_error(&local_path, &error))?;
                    synced.insert(name.clone());
                    state.downloaded_files += 1;
                }
                (false, false) => continue,
            }

            state.checked += 1;
            if !progress(state) {
                return Err(MediaSyncError::Interrupted);
            }
        }

        self.save_manifest(&synced)
    }
}

/// Regular, non-hidden files directly inside `dir`
fn list_media(dir: &Path) -> io::Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.starts_with('.') {
            names.insert(name);
        }
    }
    Ok(names)
}

fn local_error(path: &Path, error: &io::Error) -> MediaSyncError {
    MediaSyncError::Database(format!("{}: {error}", path.display()))
}

fn remote_error(path: &Path, error: &io::Error) -> MediaSyncError {
    MediaSyncError::network(
        NetworkErrorKind::Other,
        format!("{}: {error}", path.display()),
    )
}
