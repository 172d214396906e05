use std::path::Path;

use deckhand_core::db::NoteTypeRegistry;
use deckhand_core::models::NoteType;

use crate::cli::NotetypeCommands;
use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_notetype(command: NotetypeCommands, db_path: &Path) -> Result<(), CliError> {
    match command {
        NotetypeCommands::Add { name, fields } => run_notetype_add(&name, fields, db_path),
        NotetypeCommands::List { json } => run_notetype_list(json, db_path),
    }
}

pub fn run_notetype_add(name: &str, fields: Vec<String>, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let fields = fields.into_iter().map(|field| field.trim().to_string());
    let notetype = db.add_notetype(NoteType::new(name.trim(), fields))?;

    println!("{}", notetype.id);
    Ok(())
}

pub fn run_notetype_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let notetypes = db.list_notetypes()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&notetypes)?);
        return Ok(());
    }

    if notetypes.is_empty() {
        println!("No note types registered.");
        return Ok(());
    }

    for notetype in &notetypes {
        println!(
            "{:<6}  {:<16}  {}",
            notetype.id.0,
            notetype.name,
            notetype.fields.join(", ")
        );
    }
    Ok(())
}
