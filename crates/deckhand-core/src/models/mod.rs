//! Data models for deckhand

mod note;
mod notetype;
mod tag;

pub use note::{DuplicateState, Note, NoteId, USN_PENDING};
pub use notetype::{FieldMap, NoteType, NoteTypeId};
pub use tag::{canonify_tags, join_tags, split_tags};
