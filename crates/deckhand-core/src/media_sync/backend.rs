//! Interface to the component that actually moves media files.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of a running media sync, reported at each checkpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSyncProgress {
    pub uploaded_files: u32,
    pub downloaded_files: u32,
    pub uploaded_deletions: u32,
    pub downloaded_deletions: u32,
    pub checked: u32,
}

impl fmt::Display for MediaSyncProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added: {}↑ {}↓, Removed: {}↑ {}↓, Checked: {}",
            self.uploaded_files,
            self.downloaded_files,
            self.uploaded_deletions,
            self.downloaded_deletions,
            self.checked
        )
    }
}

/// Sync-level failure reported by the server side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    AuthFailed,
    ServerError,
    MediaCheckRequired,
    ResyncRequired,
    Other,
}

/// Transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Offline,
    Timeout,
    Other,
}

/// Ways a media sync run can end other than success.
///
/// The `Display` text is the raw detail shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaSyncError {
    /// The progress callback asked the backend to stop
    #[error("interrupted")]
    Interrupted,

    #[error("{message}")]
    Sync {
        kind: SyncErrorKind,
        message: String,
    },

    #[error("{message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// Local media database problem
    #[error("{0}")]
    Database(String),

    /// Anything the categories above do not cover
    #[error("{0}")]
    Other(String),
}

impl MediaSyncError {
    pub fn sync(kind: SyncErrorKind, message: impl Into<String>) -> Self {
        Self::Sync {
            kind,
            message: message.into(),
        }
    }

    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }
}

/// Something that can run one media sync.
///
/// `run_media_sync` is called on a blocking worker thread. Implementations
/// call `progress` at each checkpoint; when it returns `false` they must stop
/// and return [`MediaSyncError::Interrupted`].
pub trait MediaSyncBackend: Send + Sync {
    fn run_media_sync(
        &self,
        sync_key: &str,
        endpoint: &str,
        progress: &mut dyn FnMut(MediaSyncProgress) -> bool,
    ) -> Result<(), MediaSyncError>;
}

/// Media sync endpoint for a server shard.
///
/// # Examples
///
/// ```
/// use deckhand_core::media_sync::media_sync_endpoint;
///
/// assert_eq!(media_sync_endpoint(None), "https://sync.ankiweb.net/msync/");
/// assert_eq!(media_sync_endpoint(Some(4)), "https://sync4.ankiweb.net/msync/");
/// ```
pub fn media_sync_endpoint(shard: Option<u32>) -> String {
    let shard = shard.map(|shard| shard.to_string()).unwrap_or_default();
    format!("https://sync{shard}.ankiweb.net/msync/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_renders_counts() {
        let progress = MediaSyncProgress {
            uploaded_files: 1,
            downloaded_files: 2,
            uploaded_deletions: 3,
            downloaded_deletions: 4,
            checked: 10,
        };
        assert_eq!(
            progress.to_string(),
            "Added: 1↑ 2↓, Removed: 3↑ 4↓, Checked: 10"
        );
    }

    #[test]
    fn error_display_is_raw_detail() {
        let error = MediaSyncError::network(NetworkErrorKind::Timeout, "timed out after 30s");
        assert_eq!(error.to_string(), "timed out after 30s");
    }
}
