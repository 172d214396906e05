use std::path::Path;

use crate::commands::common::{load_note, open_database};
use crate::error::CliError;

pub fn run_dupe(id: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let note = load_note(&db, id)?;
    println!("{}", note.dupe_or_empty(&db.collection())?);
    Ok(())
}
