//! deckhand-core - Core library for Deckhand
//!
//! This crate contains the note model with field-checksum duplicate
//! detection, its SQLite storage, profile configuration and the background
//! media sync controller used by the Deckhand CLI.

pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod media_sync;
pub mod models;
pub mod text;
pub mod util;

pub use collection::Collection;
pub use error::{Error, Result};
pub use models::{Note, NoteId};
