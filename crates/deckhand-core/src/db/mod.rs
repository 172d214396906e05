//! Database layer for deckhand

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{NoteRow, NoteStore, NoteTypeRegistry, SqliteNoteStore};
