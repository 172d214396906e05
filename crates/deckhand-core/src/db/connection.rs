//! Database connection management

use crate::collection::Collection;
use crate::error::Result;
use crate::models::{FieldMap, NoteId, NoteType, NoteTypeId};
use rusqlite::Connection;
use std::path::Path;

use super::migrations;
use super::repository::{NoteRow, NoteStore, NoteTypeRegistry, SqliteNoteStore};

/// Database wrapper for a SQLite connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database at {}", path.display());
        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let database = Self { conn };
        database.configure()?;
        migrations::run(&database.conn)?;
        Ok(database)
    }

    /// Configure `SQLite` for optimal performance
    fn configure(&self) -> Result<()> {
        // Not supported for in-memory databases
        self.conn
            .execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .ok();
        self.conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
    }

    /// Storage operations over this connection
    pub const fn store(&self) -> SqliteNoteStore<'_> {
        SqliteNoteStore::new(&self.conn)
    }

    /// Collection handle backed by this database
    pub fn collection(&self) -> Collection<'_> {
        Collection::new(self, self)
    }
}

impl NoteStore for Database {
    fn load_note(&self, id: NoteId) -> Result<Option<NoteRow>> {
        self.store().load_note(id)
    }

    fn add_note(&self, note: &NoteRow) -> Result<NoteId> {
        self.store().add_note(note)
    }

    fn update_note(&self, note: &NoteRow) -> Result<()> {
        self.store().update_note(note)
    }

    fn checksum_candidates(
        &self,
        checksum: u32,
        exclude: NoteId,
        notetype_id: NoteTypeId,
    ) -> Result<Vec<String>> {
        self.store()
            .checksum_candidates(checksum, exclude, notetype_id)
    }

    fn list_note_ids(&self, notetype_id: Option<NoteTypeId>, limit: usize) -> Result<Vec<NoteId>> {
        self.store().list_note_ids(notetype_id, limit)
    }
}

impl NoteTypeRegistry for Database {
    fn add_notetype(&self, notetype: NoteType) -> Result<NoteType> {
        self.store().add_notetype(notetype)
    }

    fn get_notetype(&self, id: NoteTypeId) -> Result<Option<NoteType>> {
        self.store().get_notetype(id)
    }

    fn notetype_by_name(&self, name: &str) -> Result<Option<NoteType>> {
        self.store().notetype_by_name(name)
    }

    fn list_notetypes(&self) -> Result<Vec<NoteType>> {
        self.store().list_notetypes()
    }

    fn field_map(&self, id: NoteTypeId) -> Result<FieldMap> {
        self.store().field_map(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_notetypes().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists_between_connections() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("collection.db");

        {
            let db = Database::open(&path).unwrap();
            db.add_notetype(NoteType::new("Basic", ["Front", "Back"]))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let notetypes = db.list_notetypes().unwrap();
        assert_eq!(notetypes.len(), 1);
        assert_eq!(notetypes[0].fields, vec!["Front", "Back"]);
    }
}
