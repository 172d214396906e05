use std::path::Path;

use deckhand_core::Note;

use crate::commands::common::{notetype_by_name, open_database};
use crate::error::CliError;

/// Add a note and print its ID with its duplicate state
pub fn run_add(
    notetype: &str,
    fields: &[String],
    tags: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let notetype = notetype_by_name(&db, notetype)?;
    if fields.len() > notetype.fields.len() {
        return Err(CliError::TooManyFields {
            notetype: notetype.name,
            expected: notetype.fields.len(),
            given: fields.len(),
        });
    }

    let mut note = Note::new(&notetype);
    for (slot, value) in note.values_mut().iter_mut().zip(fields) {
        slot.clone_from(value);
    }
    if let Some(tags) = tags {
        note.set_tags_from_str(tags);
    }

    let col = db.collection();
    col.add_note(&mut note)?;
    let state = note.dupe_or_empty(&col)?;

    println!("{}  {state}", note.id);
    Ok(())
}
