//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::notetype::{FieldMap, NoteType, NoteTypeId};
use super::tag::{canonify_tags, join_tags, split_tags};
use crate::collection::Collection;
use crate::db::NoteRow;
use crate::error::{Error, Result};
use crate::text::{field_checksum, join_fields, split_fields, strip_html_media};

/// Usn of a record with local changes not yet sent to the server
pub const USN_PENDING: i32 = -1;

/// Identifier of a note. 0 until the note has been added to a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub i64);

impl NoteId {
    /// Whether this id refers to a persisted note
    pub const fn is_persisted(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Result of checking a note's first field against the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateState {
    /// First field is blank
    Empty,
    /// Another note of the same type has the same visible first field
    Duplicate,
    /// No other note matches
    Unique,
}

impl fmt::Display for DuplicateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Empty => "empty",
            Self::Duplicate => "duplicate",
            Self::Unique => "unique",
        };
        f.write_str(label)
    }
}

/// A note: an ordered set of fields shaped by its note type, plus tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Unique identifier, 0 for a note not yet added
    pub id: NoteId,
    guid: String,
    /// Note type this note was created from
    pub notetype_id: NoteTypeId,
    /// Last modification (Unix seconds)
    pub mtime: i64,
    /// Update sequence number for sync change tracking
    pub usn: i32,
    /// Tags in insertion order; may contain duplicates until persisted
    pub tags: Vec<String>,
    fields: Vec<String>,
    field_map: FieldMap,
}

impl Note {
    /// Create a new, empty note for the given note type
    #[must_use]
    pub fn new(notetype: &NoteType) -> Self {
        let field_map = notetype.field_map();
        Self {
            id: NoteId::default(),
            guid: Uuid::now_v7().simple().to_string(),
            notetype_id: notetype.id,
            mtime: 0,
            usn: USN_PENDING,
            tags: Vec::new(),
            fields: vec![String::new(); field_map.len()],
            field_map,
        }
    }

    /// Load an existing note from the collection
    pub fn load(col: &Collection<'_>, id: NoteId) -> Result<Self> {
        let row = col
            .store()
            .load_note(id)?
            .ok_or_else(|| Error::NotFound(format!("note {id}")))?;
        let field_map = col.notetypes().field_map(row.notetype_id)?;
        Self::from_row(row, field_map)
    }

    pub(crate) fn from_row(row: NoteRow, field_map: FieldMap) -> Result<Self> {
        if row.fields.len() != field_map.len() {
            return Err(Error::InvalidInput(format!(
                "note {} has {} fields but its note type defines {}",
                row.id,
                row.fields.len(),
                field_map.len()
            )));
        }
        Ok(Self {
            id: row.id,
            guid: row.guid,
            notetype_id: row.notetype_id,
            mtime: row.mtime,
            usn: row.usn,
            tags: row.tags,
            fields: row.fields,
            field_map,
        })
    }

    pub(crate) fn to_row(&self) -> NoteRow {
        NoteRow {
            id: self.id,
            guid: self.guid.clone(),
            notetype_id: self.notetype_id,
            mtime: self.mtime,
            usn: self.usn,
            tags: self.tags.clone(),
            fields: self.fields.clone(),
        }
    }

    /// Globally unique identifier, fixed at creation
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Whether the note has been added to a collection
    pub const fn is_new(&self) -> bool {
        !self.id.is_persisted()
    }

    /// Write the full note over its stored copy.
    ///
    /// Updates the modification time and marks the note as pending sync.
    pub fn flush(&mut self, col: &Collection<'_>) -> Result<()> {
        if self.is_new() {
            return Err(Error::InvalidInput(
                "note must be added before it can be flushed".to_string(),
            ));
        }
        self.mtime = crate::util::unix_timestamp_now();
        self.usn = USN_PENDING;
        col.store().update_note(&self.to_row())?;
        tracing::debug!(note_id = %self.id, "Flushed note");
        Ok(())
    }

    /// All fields joined into the stored blob form
    pub fn joined_fields(&self) -> String {
        join_fields(&self.fields)
    }

    // Field access
    // ------------------------------------------------------------------

    fn ordinal(&self, key: &str) -> Result<usize> {
        self.field_map
            .ordinal(key)
            .ok_or_else(|| Error::UnknownField(key.to_string()))
    }

    /// Value of the named field
    pub fn get(&self, key: &str) -> Result<&str> {
        let ord = self.ordinal(key)?;
        self.fields
            .get(ord)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownField(key.to_string()))
    }

    /// Replace the value of the named field
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let ord = self.ordinal(key)?;
        let slot = self
            .fields
            .get_mut(ord)
            .ok_or_else(|| Error::UnknownField(key.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Whether the note type defines the named field
    pub fn contains(&self, key: &str) -> bool {
        self.field_map.ordinal(key).is_some()
    }

    /// Field names in ordinal order
    pub fn keys(&self) -> &[String] {
        self.field_map.names()
    }

    /// Field values in ordinal order
    pub fn values(&self) -> &[String] {
        &self.fields
    }

    /// Mutable field values. The slice keeps the note type's field count.
    pub fn values_mut(&mut self) -> &mut [String] {
        &mut self.fields
    }

    /// `(name, value)` pairs in ordinal order
    pub fn items(&self) -> Vec<(&str, &str)> {
        self.field_map
            .names()
            .iter()
            .zip(&self.fields)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    // Tags
    // ------------------------------------------------------------------

    /// Case-sensitive membership test
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Append a tag. Duplicates are collapsed when the note is persisted.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Remove every tag equal to `tag`, ignoring case
    pub fn remove_tag(&mut self, tag: &str) {
        let tag = tag.to_lowercase();
        self.tags.retain(|existing| existing.to_lowercase() != tag);
    }

    /// Canonical tags as a space-separated string
    pub fn string_tags(&self) -> String {
        join_tags(&canonify_tags(&self.tags))
    }

    /// Replace the tags with those parsed from a space-separated string
    pub fn set_tags_from_str(&mut self, tags: &str) {
        self.tags = split_tags(tags);
    }

    // Duplicate check
    // ------------------------------------------------------------------

    /// Check the first field against other notes of the same type.
    ///
    /// Candidates are narrowed by checksum, then compared on their visible
    /// text so checksum collisions and markup differences do not count.
    pub fn dupe_or_empty(&self, col: &Collection<'_>) -> Result<DuplicateState> {
        let Some(first) = self.fields.first() else {
            return Ok(DuplicateState::Empty);
        };
        if first.trim().is_empty() {
            return Ok(DuplicateState::Empty);
        }

        let stripped = strip_html_media(first);
        let candidates =
            col.store()
                .checksum_candidates(field_checksum(first), self.id, self.notetype_id)?;
        let duplicate = candidates.iter().any(|joined| {
            split_fields(joined)
                .first()
                .is_some_and(|other| strip_html_media(other) == stripped)
        });

        Ok(if duplicate {
            DuplicateState::Duplicate
        } else {
            DuplicateState::Unique
        })
    }
}
