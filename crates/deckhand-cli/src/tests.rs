use std::path::Path;

use deckhand_core::config::{ProfileConfig, SyncProfile};
use deckhand_core::db::{Database, NoteStore, NoteTypeRegistry};
use deckhand_core::models::{DuplicateState, NoteType};
use deckhand_core::{Note, NoteId};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::cli::{CompletionShell, TagCommands};
use crate::commands::add::run_add;
use crate::commands::common::{
    format_relative_time, format_timestamp, note_preview, parse_note_id,
};
use crate::commands::completions::render_completions;
use crate::commands::config::run_config_set;
use crate::commands::edit::run_set;
use crate::commands::media::{folder_backend, run_log_in, run_log_out, run_media_sync};
use crate::commands::notetype::run_notetype_add;
use crate::commands::tag::run_tag;
use crate::credentials::KeychainProfile;
use crate::error::CliError;

fn basic_db(path: &Path) {
    run_notetype_add("Basic", vec!["Front".to_string(), "Back".to_string()], path).unwrap();
}

fn note_ids(path: &Path) -> Vec<NoteId> {
    let db = Database::open(path).unwrap();
    let mut ids = db.list_note_ids(None, 100).unwrap();
    ids.sort();
    ids
}

fn load(path: &Path, id: NoteId) -> Note {
    let db = Database::open(path).unwrap();
    Note::load(&db.collection(), id).unwrap()
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30, now), "just now");
    assert_eq!(format_relative_time(now - 120, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60, now), "3d ago");
}

#[test]
fn format_timestamp_returns_utc_label() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn note_preview_strips_markup_and_truncates() {
    let notetype = NoteType::new("Basic", ["Front"]);
    let mut note = Note::new(&notetype);
    note.values_mut()[0] = "<b>This is a very long</b> sentence that should be shortened".to_string();

    assert_eq!(note_preview(&note, 20), "This is a very lo...");
    assert_eq!(
        note_preview(&note, 100),
        "This is a very long sentence that should be shortened"
    );
}

#[test]
fn parse_note_id_rejects_unpersisted_and_garbage() {
    assert_eq!(parse_note_id(" 42 ").unwrap(), NoteId(42));
    assert!(matches!(parse_note_id("0"), Err(CliError::InvalidNoteId(_))));
    assert!(matches!(parse_note_id("abc"), Err(CliError::InvalidNoteId(_))));
}

#[test]
fn run_add_stores_fields_tags_and_detects_duplicates() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("collection.db");
    basic_db(&db_path);

    let fields = vec!["<b>capital</b> of France".to_string(), "Paris".to_string()];
    run_add("Basic", &fields, Some("geo Europe geo"), &db_path).unwrap();
    run_add("Basic", &["capital of France".to_string()], None, &db_path).unwrap();

    let ids = note_ids(&db_path);
    assert_eq!(ids.len(), 2);

    let first = load(&db_path, ids[0]);
    assert_eq!(first.get("Back").unwrap(), "Paris");
    assert_eq!(first.tags, vec!["Europe".to_string(), "geo".to_string()]);

    let second = load(&db_path, ids[1]);
    let db = Database::open(&db_path).unwrap();
    assert_eq!(
        second.dupe_or_empty(&db.collection()).unwrap(),
        DuplicateState::Duplicate
    );
}

#[test]
fn run_add_rejects_unknown_notetype_and_extra_fields() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("collection.db");
    basic_db(&db_path);

    let error = run_add("Cloze", &["x".to_string()], None, &db_path).unwrap_err();
    assert!(matches!(error, CliError::NotetypeNotFound(_)));

    let fields = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let error = run_add("Basic", &fields, None, &db_path).unwrap_err();
    assert!(matches!(
        error,
        CliError::TooManyFields {
            expected: 2,
            given: 3,
            ..
        }
    ));
    assert!(note_ids(&db_path).is_empty());
}

#[test]
fn run_set_updates_field_and_marks_pending() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("collection.db");
    basic_db(&db_path);
    run_add("Basic", &["front".to_string()], None, &db_path).unwrap();
    let id = note_ids(&db_path)[0];

    run_set(&id.to_string(), "Back", "answer", &db_path).unwrap();
    let note = load(&db_path, id);
    assert_eq!(note.get("Back").unwrap(), "answer");
    assert_eq!(note.usn, -1);

    let error = run_set(&id.to_string(), "Extra", "x", &db_path).unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(deckhand_core::Error::UnknownField(_))
    ));
}

#[test]
fn run_tag_adds_and_removes_ignoring_case() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("collection.db");
    basic_db(&db_path);
    run_add("Basic", &["front".to_string()], Some("Keep"), &db_path).unwrap();
    let id = note_ids(&db_path)[0].to_string();

    run_tag(
        TagCommands::Add {
            id: id.clone(),
            tag: "Vocab".to_string(),
        },
        &db_path,
    )
    .unwrap();
    assert!(load(&db_path, NoteId(id.parse().unwrap())).has_tag("Vocab"));

    run_tag(
        TagCommands::Remove {
            id: id.clone(),
            tag: "vocab".to_string(),
        },
        &db_path,
    )
    .unwrap();
    let note = load(&db_path, NoteId(id.parse().unwrap()));
    assert_eq!(note.tags, vec!["Keep".to_string()]);
}

#[test]
fn notetype_add_rejects_duplicate_names() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("collection.db");
    basic_db(&db_path);

    let error = run_notetype_add("Basic", vec!["Only".to_string()], &db_path).unwrap_err();
    assert!(matches!(error, CliError::Core(_)));

    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.list_notetypes().unwrap().len(), 1);
}

#[test]
fn run_config_set_persists_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("profile.json");

    run_config_set(
        &config_path,
        Some(false),
        Some(2),
        Some(dir.path().join("media")),
        None,
    )
    .unwrap();

    let config = ProfileConfig::load_from_path(&config_path).unwrap();
    assert!(!config.media_sync_enabled);
    assert_eq!(config.sync_shard, Some(2));
    assert_eq!(config.media_dir, Some(dir.path().join("media")));
    assert_eq!(config.remote_media_dir, None);
}

#[test]
fn folder_backend_requires_both_folders() {
    let config = ProfileConfig {
        media_dir: Some("local".into()),
        ..ProfileConfig::default()
    };
    assert!(matches!(
        folder_backend(&config),
        Err(CliError::MediaFoldersNotConfigured)
    ));
}

#[test]
fn log_in_stores_key_and_shard() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("profile.json");

    run_log_in("  key-1  ".to_string(), Some(5), &config_path).unwrap();
    let profile = KeychainProfile::load(&config_path).unwrap();
    assert_eq!(profile.sync_key().as_deref(), Some("key-1"));
    assert_eq!(profile.sync_shard(), Some(5));

    run_log_out(&config_path).unwrap();
    assert_eq!(KeychainProfile::load(&config_path).unwrap().sync_key(), None);

    let error = run_log_in("   ".to_string(), None, &config_path).unwrap_err();
    assert!(matches!(error, CliError::NotLoggedIn));
}

#[tokio::test]
async fn media_sync_mirrors_folders() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("profile.json");
    let local = dir.path().join("local");
    let remote = dir.path().join("remote");
    std::fs::create_dir_all(&local).unwrap();
    std::fs::create_dir_all(&remote).unwrap();
    std::fs::write(local.join("cat.jpg"), b"cat").unwrap();
    std::fs::write(remote.join("dog.jpg"), b"dog").unwrap();

    run_config_set(&config_path, None, None, Some(local.clone()), Some(remote.clone())).unwrap();
    run_log_in("key".to_string(), None, &config_path).unwrap();

    run_media_sync(&config_path).await.unwrap();

    assert_eq!(std::fs::read(remote.join("cat.jpg")).unwrap(), b"cat");
    assert_eq!(std::fs::read(local.join("dog.jpg")).unwrap(), b"dog");
}

#[tokio::test]
async fn media_sync_requires_login_and_enabled_profile() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("profile.json");
    run_config_set(
        &config_path,
        None,
        None,
        Some(dir.path().join("local")),
        Some(dir.path().join("remote")),
    )
    .unwrap();

    let error = run_media_sync(&config_path).await.unwrap_err();
    assert!(matches!(error, CliError::NotLoggedIn));

    run_log_in("key".to_string(), None, &config_path).unwrap();
    run_config_set(&config_path, Some(false), None, None, None).unwrap();
    let error = run_media_sync(&config_path).await.unwrap_err();
    assert!(matches!(error, CliError::MediaSyncDisabled));
}

#[test]
fn bash_completions_use_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("_deckhand()"));
    assert!(script.contains("complete -F _deckhand"));
}
