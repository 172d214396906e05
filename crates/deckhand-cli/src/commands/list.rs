use std::path::Path;

use deckhand_core::db::NoteStore;
use deckhand_core::Note;

use crate::commands::common::{
    format_note_lines, note_view, notetype_by_name, notetype_name, open_database, NoteView,
};
use crate::error::CliError;

pub fn run_list(
    notetype: Option<&str>,
    limit: usize,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let notetype_id = notetype
        .map(|name| notetype_by_name(&db, name).map(|notetype| notetype.id))
        .transpose()?;

    let col = db.collection();
    let mut notes = Vec::new();
    for id in db.list_note_ids(notetype_id, limit)? {
        let note = Note::load(&col, id)?;
        let name = notetype_name(&db, &note)?;
        notes.push((note, name));
    }

    if as_json {
        let json_items = notes
            .iter()
            .map(|(note, name)| note_view(note, name))
            .collect::<Vec<NoteView>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }

    Ok(())
}
