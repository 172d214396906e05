use std::path::Path;

use crate::commands::common::{format_timestamp, load_note, note_view, notetype_name, open_database};
use crate::error::CliError;

pub fn run_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let note = load_note(&db, id)?;
    let notetype = notetype_name(&db, &note)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note_view(&note, &notetype))?);
        return Ok(());
    }

    println!("Note {} ({notetype})", note.id);
    println!("Modified: {}", format_timestamp(note.mtime));
    for (name, value) in note.items() {
        println!("{name}: {value}");
    }
    let tags = note.string_tags();
    if !tags.is_empty() {
        println!("Tags: {}", tags.trim());
    }
    Ok(())
}
