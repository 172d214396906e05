use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] deckhand_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),
    #[error("Note type not found: {0}")]
    NotetypeNotFound(String),
    #[error("Note type '{notetype}' has {expected} fields, got {given}")]
    TooManyFields {
        notetype: String,
        expected: usize,
        given: usize,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Keychain error: {0}")]
    Keychain(String),
    #[error("Not logged in. Run `deckhand media log-in <KEY>` first.")]
    NotLoggedIn,
    #[error("Media sync is disabled. Run `deckhand config set --media-sync true` to enable it.")]
    MediaSyncDisabled,
    #[error(
        "Media folders are not configured. Run `deckhand config set --media-dir <PATH> --remote-media-dir <PATH>`."
    )]
    MediaFoldersNotConfigured,
}
