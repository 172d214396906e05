//! Error types for deckhand-core

use thiserror::Error;

/// Result type alias using deckhand-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deckhand-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Field name is not part of the note type's field map
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note or note type not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Profile configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A media sync failure outside the known error taxonomy
    #[error("Unhandled media sync error: {0}")]
    UnhandledMediaSync(String),
}
