use std::path::Path;

use crate::commands::common::{load_note, open_database};
use crate::error::CliError;

/// Replace one field and print the note's duplicate state afterwards
pub fn run_set(id: &str, field: &str, value: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let col = db.collection();
    let mut note = load_note(&db, id)?;

    note.set(field, value)?;
    note.flush(&col)?;

    println!("{}", note.dupe_or_empty(&col)?);
    Ok(())
}
