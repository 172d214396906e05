use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use deckhand_core::db::{Database, NoteTypeRegistry};
use deckhand_core::models::NoteType;
use deckhand_core::text::strip_html;
use deckhand_core::{Note, NoteId};
use serde::Serialize;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "profile.json";

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct NoteView {
    pub id: i64,
    pub guid: String,
    pub notetype: String,
    pub mtime: i64,
    pub modified: String,
    pub usn: i32,
    pub fields: Vec<FieldView>,
    pub tags: Vec<String>,
}

pub fn note_view(note: &Note, notetype_name: &str) -> NoteView {
    NoteView {
        id: note.id.0,
        guid: note.guid().to_string(),
        notetype: notetype_name.to_string(),
        mtime: note.mtime,
        modified: format_timestamp(note.mtime),
        usn: note.usn,
        fields: note
            .items()
            .into_iter()
            .map(|(name, value)| FieldView {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect(),
        tags: note.tags.clone(),
    }
}

pub fn parse_note_id(id: &str) -> Result<NoteId, CliError> {
    id.parse::<NoteId>()
        .ok()
        .filter(|note_id| note_id.is_persisted())
        .ok_or_else(|| CliError::InvalidNoteId(id.trim().to_string()))
}

pub fn load_note(db: &Database, id: &str) -> Result<Note, CliError> {
    let note_id = parse_note_id(id)?;
    Ok(Note::load(&db.collection(), note_id)?)
}

pub fn notetype_by_name(db: &Database, name: &str) -> Result<NoteType, CliError> {
    let name = name.trim();
    db.notetype_by_name(name)?
        .ok_or_else(|| CliError::NotetypeNotFound(name.to_string()))
}

pub fn notetype_name(db: &Database, note: &Note) -> Result<String, CliError> {
    Ok(db.collection().notetype(note.notetype_id)?.name)
}

/// First field with markup removed, collapsed to one line
pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first = note.values().first().map(String::as_str).unwrap_or_default();
    let collapsed = strip_html(first)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_note_lines(notes: &[(Note, String)]) -> Vec<String> {
    let now = Utc::now().timestamp();
    notes
        .iter()
        .map(|(note, notetype)| {
            let preview = note_preview(note, 40);
            let relative_time = format_relative_time(note.mtime, now);
            let tags = note.string_tags();
            let tags = tags.trim();

            if tags.is_empty() {
                format!("{:<8}  {notetype:<12}  {preview:<40}  {relative_time}", note.id.0)
            } else {
                format!(
                    "{:<8}  {notetype:<12}  {preview:<40}  {relative_time:<10}  {tags}",
                    note.id.0
                )
            }
        })
        .collect()
}

pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0).map_or_else(
        || timestamp.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Both arguments in Unix seconds
pub fn format_relative_time(timestamp: i64, now: i64) -> String {
    let diff = now.saturating_sub(timestamp);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match cli_db_path.or_else(|| env::var_os("DECKHAND_DB_PATH").map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("deckhand").join("collection.db"))
        .ok_or_else(|| CliError::Config("failed to resolve data directory".to_string()))
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match cli_config_path.or_else(|| env::var_os("DECKHAND_CONFIG").map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("deckhand").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("failed to resolve config directory".to_string()))
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    Ok(Database::open(path)?)
}
