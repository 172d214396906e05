use std::path::Path;

use crate::cli::TagCommands;
use crate::commands::common::{load_note, open_database};
use crate::error::CliError;

pub fn run_tag(command: TagCommands, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let col = db.collection();

    match command {
        TagCommands::Add { id, tag } => {
            let mut note = load_note(&db, &id)?;
            note.add_tag(tag.trim());
            note.flush(&col)?;
            println!("{}", note.string_tags().trim());
        }
        TagCommands::Remove { id, tag } => {
            let mut note = load_note(&db, &id)?;
            note.remove_tag(tag.trim());
            note.flush(&col)?;
            println!("{}", note.string_tags().trim());
        }
        TagCommands::Has { id, tag } => {
            let note = load_note(&db, &id)?;
            println!("{}", if note.has_tag(&tag) { "yes" } else { "no" });
        }
    }
    Ok(())
}
