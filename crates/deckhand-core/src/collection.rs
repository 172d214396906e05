//! Collection handle passed to note operations.

use crate::db::{NoteStore, NoteTypeRegistry};
use crate::error::{Error, Result};
use crate::models::{Note, NoteType, NoteTypeId, USN_PENDING};

/// Borrowed view of a note store and the note type registry it belongs to
#[derive(Clone, Copy)]
pub struct Collection<'a> {
    store: &'a dyn NoteStore,
    notetypes: &'a dyn NoteTypeRegistry,
}

impl<'a> Collection<'a> {
    pub fn new(store: &'a dyn NoteStore, notetypes: &'a dyn NoteTypeRegistry) -> Self {
        Self { store, notetypes }
    }

    pub fn store(&self) -> &'a dyn NoteStore {
        self.store
    }

    pub fn notetypes(&self) -> &'a dyn NoteTypeRegistry {
        self.notetypes
    }

    /// Create a new, empty note of a registered note type
    pub fn new_note(&self, notetype_id: NoteTypeId) -> Result<Note> {
        let notetype = self.notetype(notetype_id)?;
        Ok(Note::new(&notetype))
    }

    /// Get a registered note type, failing if it does not exist
    pub fn notetype(&self, id: NoteTypeId) -> Result<NoteType> {
        self.notetypes
            .get_notetype(id)?
            .ok_or_else(|| Error::NotFound(format!("note type {id}")))
    }

    /// Insert a new note and assign its ID
    pub fn add_note(&self, note: &mut Note) -> Result<()> {
        if !note.is_new() {
            return Err(Error::InvalidInput(format!(
                "note {} has already been added",
                note.id
            )));
        }
        self.notetype(note.notetype_id)?;

        note.mtime = crate::util::unix_timestamp_now();
        note.usn = USN_PENDING;
        note.id = self.store.add_note(&note.to_row())?;
        tracing::info!(note_id = %note.id, "Added note");
        Ok(())
    }
}
