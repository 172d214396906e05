//! Note type model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a note type. 0 until registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteTypeId(pub i64);

impl fmt::Display for NoteTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Schema of a note: an ordered list of field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteType {
    /// Unique identifier
    pub id: NoteTypeId,
    /// Display name
    pub name: String,
    /// Field names in ordinal order
    pub fields: Vec<String>,
}

impl NoteType {
    /// Create an unregistered note type
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: NoteTypeId::default(),
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Field name to ordinal mapping for this note type
    #[must_use]
    pub fn field_map(&self) -> FieldMap {
        FieldMap::new(self.fields.iter().cloned())
    }
}

/// Ordered mapping from field name to positional ordinal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    names: Vec<String>,
    ordinals: HashMap<String, usize>,
}

impl FieldMap {
    /// Build a map from names in ordinal order.
    ///
    /// If a name repeats, the first ordinal wins.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let names: Vec<String> = names.into_iter().collect();
        let mut ordinals = HashMap::with_capacity(names.len());
        for (ord, name) in names.iter().enumerate() {
            ordinals.entry(name.clone()).or_insert(ord);
        }
        Self { names, ordinals }
    }

    /// Ordinal of the named field
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(name).copied()
    }

    /// Field names in ordinal order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_follows_declaration_order() {
        let notetype = NoteType::new("Basic", ["Front", "Back"]);
        let map = notetype.field_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.ordinal("Front"), Some(0));
        assert_eq!(map.ordinal("Back"), Some(1));
        assert_eq!(map.ordinal("front"), None);
        assert_eq!(map.names(), ["Front", "Back"]);
    }

    #[test]
    fn new_notetype_is_unregistered() {
        let notetype = NoteType::new("Basic", ["Front"]);
        assert_eq!(notetype.id, NoteTypeId(0));
    }
}
