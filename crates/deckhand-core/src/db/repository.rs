//! Note and note type storage

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{canonify_tags, join_tags, split_tags, FieldMap, NoteId, NoteType, NoteTypeId};
use crate::text::{field_checksum, join_fields, split_fields};
use rusqlite::{params, Connection, OptionalExtension};

/// Stored snapshot of a note, independent of its note type's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: NoteId,
    pub guid: String,
    pub notetype_id: NoteTypeId,
    pub mtime: i64,
    pub usn: i32,
    pub tags: Vec<String>,
    pub fields: Vec<String>,
}

/// Trait for note storage operations
pub trait NoteStore {
    /// Get a note by ID
    fn load_note(&self, id: NoteId) -> Result<Option<NoteRow>>;

    /// Insert a new note and return its assigned ID
    fn add_note(&self, note: &NoteRow) -> Result<NoteId>;

    /// Overwrite a stored note by ID
    fn update_note(&self, note: &NoteRow) -> Result<()>;

    /// Joined field blobs of notes of the given type whose first-field
    /// checksum matches, excluding `exclude`
    fn checksum_candidates(
        &self,
        checksum: u32,
        exclude: NoteId,
        notetype_id: NoteTypeId,
    ) -> Result<Vec<String>>;

    /// Most recently modified note IDs, optionally limited to one note type
    fn list_note_ids(&self, notetype_id: Option<NoteTypeId>, limit: usize) -> Result<Vec<NoteId>>;
}

/// Trait for note type lookups
pub trait NoteTypeRegistry {
    /// Register a note type and return it with its assigned ID
    fn add_notetype(&self, notetype: NoteType) -> Result<NoteType>;

    /// Get a note type by ID
    fn get_notetype(&self, id: NoteTypeId) -> Result<Option<NoteType>>;

    /// Get a note type by its exact name
    fn notetype_by_name(&self, name: &str) -> Result<Option<NoteType>>;

    /// All note types, by name
    fn list_notetypes(&self) -> Result<Vec<NoteType>>;

    /// Field name to ordinal mapping of a note type
    fn field_map(&self, id: NoteTypeId) -> Result<FieldMap> {
        self.get_notetype(id)?
            .map(|notetype| notetype.field_map())
            .ok_or_else(|| Error::NotFound(format!("note type {id}")))
    }
}

/// `SQLite` implementation of `NoteStore` and `NoteTypeRegistry`
pub struct SqliteNoteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteNoteStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
        let tags: String = row.get(5)?;
        let fields: String = row.get(6)?;
        Ok(NoteRow {
            id: NoteId(row.get(0)?),
            guid: row.get(1)?,
            notetype_id: NoteTypeId(row.get(2)?),
            mtime: row.get(3)?,
            usn: row.get(4)?,
            tags: split_tags(&tags),
            fields: split_fields(&fields),
        })
    }

    fn parse_notetype(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }

    fn build_notetype((id, name, fields): (i64, String, String)) -> Result<NoteType> {
        Ok(NoteType {
            id: NoteTypeId(id),
            name,
            fields: serde_json::from_str(&fields)?,
        })
    }

    /// Values derived from a note at write time: canonical tags, joined
    /// fields and first-field checksum
    fn derived_columns(note: &NoteRow) -> (String, String, u32) {
        let first = note.fields.first().map_or("", String::as_str);
        (
            join_tags(&canonify_tags(&note.tags)),
            join_fields(&note.fields),
            field_checksum(first),
        )
    }

    fn validate_notetype(notetype: &NoteType) -> Result<()> {
        if notetype.name.trim().is_empty() {
            return Err(Error::InvalidInput("note type name cannot be empty".into()));
        }
        if notetype.fields.is_empty() {
            return Err(Error::InvalidInput(format!(
                "note type '{}' needs at least one field",
                notetype.name
            )));
        }
        let mut seen = HashSet::new();
        for field in &notetype.fields {
            if field.trim().is_empty() {
                return Err(Error::InvalidInput("field names cannot be empty".into()));
            }
            if !seen.insert(field.as_str()) {
                return Err(Error::InvalidInput(format!("duplicate field name '{field}'")));
            }
        }
        Ok(())
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn load_note(&self, id: NoteId) -> Result<Option<NoteRow>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, guid, notetype_id, mtime, usn, tags, flds FROM notes WHERE id = ?",
                params![id.0],
                Self::parse_note,
            )
            .optional()?;
        Ok(note)
    }

    fn add_note(&self, note: &NoteRow) -> Result<NoteId> {
        let (tags, flds, csum) = Self::derived_columns(note);
        self.conn.execute(
            "INSERT INTO notes (guid, notetype_id, mtime, usn, tags, flds, csum)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                note.guid,
                note.notetype_id.0,
                note.mtime,
                note.usn,
                tags,
                flds,
                csum
            ],
        )?;
        let id = NoteId(self.conn.last_insert_rowid());
        tracing::debug!(note_id = %id, "Added note");
        Ok(id)
    }

    fn update_note(&self, note: &NoteRow) -> Result<()> {
        let (tags, flds, csum) = Self::derived_columns(note);
        let rows = self.conn.execute(
            "UPDATE notes
             SET guid = ?, notetype_id = ?, mtime = ?, usn = ?, tags = ?, flds = ?, csum = ?
             WHERE id = ?",
            params![
                note.guid,
                note.notetype_id.0,
                note.mtime,
                note.usn,
                tags,
                flds,
                csum,
                note.id.0
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("note {}", note.id)));
        }
        Ok(())
    }

    fn checksum_candidates(
        &self,
        checksum: u32,
        exclude: NoteId,
        notetype_id: NoteTypeId,
    ) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT flds FROM notes WHERE csum = ? AND id != ? AND notetype_id = ?")?;
        let blobs = stmt
            .query_map(params![checksum, exclude.0, notetype_id.0], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(blobs)
    }

    fn list_note_ids(&self, notetype_id: Option<NoteTypeId>, limit: usize) -> Result<Vec<NoteId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM notes
             WHERE ?1 IS NULL OR notetype_id = ?1
             ORDER BY mtime DESC, id DESC
             LIMIT ?2",
        )?;
        let ids = stmt
            .query_map(params![notetype_id.map(|id| id.0), limit as i64], |row| {
                row.get(0).map(NoteId)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }
}

impl NoteTypeRegistry for SqliteNoteStore<'_> {
    fn add_notetype(&self, mut notetype: NoteType) -> Result<NoteType> {
        Self::validate_notetype(&notetype)?;
        notetype.name = notetype.name.trim().to_string();
        if self.notetype_by_name(&notetype.name)?.is_some() {
            return Err(Error::InvalidInput(format!(
                "note type '{}' already exists",
                notetype.name
            )));
        }

        self.conn.execute(
            "INSERT INTO notetypes (name, fields) VALUES (?, ?)",
            params![notetype.name, serde_json::to_string(&notetype.fields)?],
        )?;
        notetype.id = NoteTypeId(self.conn.last_insert_rowid());
        tracing::debug!(notetype_id = %notetype.id, name = %notetype.name, "Added note type");
        Ok(notetype)
    }

    fn get_notetype(&self, id: NoteTypeId) -> Result<Option<NoteType>> {
        self.conn
            .query_row(
                "SELECT id, name, fields FROM notetypes WHERE id = ?",
                params![id.0],
                Self::parse_notetype,
            )
            .optional()?
            .map(Self::build_notetype)
            .transpose()
    }

    fn notetype_by_name(&self, name: &str) -> Result<Option<NoteType>> {
        self.conn
            .query_row(
                "SELECT id, name, fields FROM notetypes WHERE name = ?",
                params![name.trim()],
                Self::parse_notetype,
            )
            .optional()?
            .map(Self::build_notetype)
            .transpose()
    }

    fn list_notetypes(&self) -> Result<Vec<NoteType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, fields FROM notetypes ORDER BY name ASC")?;
        let rows = stmt
            .query_map([], Self::parse_notetype)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(Self::build_notetype).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> (Database, NoteType) {
        let db = Database::open_in_memory().unwrap();
        let notetype = db
            .store()
            .add_notetype(NoteType::new("Basic", ["Front", "Back"]))
            .unwrap();
        (db, notetype)
    }

    fn row(notetype: &NoteType, fields: &[&str], tags: &[&str]) -> NoteRow {
        NoteRow {
            id: NoteId(0),
            guid: uuid::Uuid::now_v7().to_string(),
            notetype_id: notetype.id,
            mtime: 1,
            usn: -1,
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            fields: fields.iter().map(|field| (*field).to_string()).collect(),
        }
    }

    #[test]
    fn test_add_and_load_note() {
        let (db, notetype) = setup();
        let repo = db.store();

        let id = repo.add_note(&row(&notetype, &["front", "back"], &[])).unwrap();
        assert!(id.is_persisted());

        let loaded = repo.load_note(id).unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.fields, vec!["front", "back"]);
    }

    #[test]
    fn test_tags_are_canonicalized_on_write() {
        let (db, notetype) = setup();
        let repo = db.store();

        let id = repo
            .add_note(&row(&notetype, &["a", "b"], &["verb", "Noun", "VERB", "verb"]))
            .unwrap();
        let loaded = repo.load_note(id).unwrap().unwrap();
        assert_eq!(loaded.tags, vec!["Noun", "verb"]);
    }

    #[test]
    fn test_update_missing_note() {
        let (db, notetype) = setup();
        let mut note = row(&notetype, &["a", "b"], &[]);
        note.id = NoteId(404);
        assert!(matches!(db.store().update_note(&note), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_checksum_candidates_filters_by_type_and_id() {
        let (db, notetype) = setup();
        let repo = db.store();
        let other = repo
            .add_notetype(NoteType::new("Other", ["Front"]))
            .unwrap();

        let first = repo.add_note(&row(&notetype, &["<b>same</b>", "1"], &[])).unwrap();
        repo.add_note(&row(&notetype, &["same", "2"], &[])).unwrap();
        repo.add_note(&row(&other, &["same"], &[])).unwrap();
        repo.add_note(&row(&notetype, &["different", "3"], &[])).unwrap();

        let candidates = repo
            .checksum_candidates(field_checksum("same"), first, notetype.id)
            .unwrap();
        assert_eq!(candidates, vec!["same\x1f2"]);

        let candidates = repo
            .checksum_candidates(field_checksum("same"), NoteId(0), notetype.id)
            .unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_list_note_ids_by_type() {
        let (db, notetype) = setup();
        let repo = db.store();
        let other = repo
            .add_notetype(NoteType::new("Other", ["Front"]))
            .unwrap();

        let first = repo.add_note(&row(&notetype, &["a", ""], &[])).unwrap();
        let second = repo.add_note(&row(&notetype, &["b", ""], &[])).unwrap();
        repo.add_note(&row(&other, &["c"], &[])).unwrap();

        assert_eq!(
            repo.list_note_ids(Some(notetype.id), 10).unwrap(),
            vec![second, first]
        );
        assert_eq!(repo.list_note_ids(None, 10).unwrap().len(), 3);
        assert_eq!(repo.list_note_ids(None, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_notetype_lookup() {
        let (db, notetype) = setup();
        let repo = db.store();

        assert_eq!(repo.get_notetype(notetype.id).unwrap(), Some(notetype.clone()));
        assert_eq!(repo.notetype_by_name(" Basic ").unwrap(), Some(notetype.clone()));
        assert_eq!(repo.get_notetype(NoteTypeId(77)).unwrap(), None);
        assert_eq!(repo.field_map(notetype.id).unwrap().ordinal("Back"), Some(1));
        assert!(matches!(repo.field_map(NoteTypeId(77)), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_notetype_validation() {
        let (db, _) = setup();
        let repo = db.store();

        assert!(repo.add_notetype(NoteType::new("Basic", ["Front"])).is_err());
        assert!(repo.add_notetype(NoteType::new(" ", ["Front"])).is_err());
        assert!(repo
            .add_notetype(NoteType::new("Empty", Vec::<String>::new()))
            .is_err());
        assert!(repo.add_notetype(NoteType::new("Twice", ["A", "A"])).is_err());
        assert!(repo.add_notetype(NoteType::new("Blank", ["A", " "])).is_err());
    }
}
