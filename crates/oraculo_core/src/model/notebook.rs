//! Notebook: the ordered theme → notes mapping.
//!
//! # Responsibility
//! - Own every theme's note list and keep theme insertion order.
//! - Serialize to / deserialize from the persisted JSON object shape
//!   `{ "<theme>": [{ "title": …, "content": … }] }`.
//!
//! # Invariants
//! - Theme keys are non-empty and unique.
//! - Theme order is insertion order; a renamed theme moves to the end.
//! - JSON key order is preserved in both directions.

use crate::model::note::Note;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeEntry {
    name: String,
    notes: Vec<Note>,
}

/// Ordered mapping from theme name to its notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    entries: Vec<ThemeEntry>,
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of themes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total note count across all themes.
    pub fn note_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.notes.len()).sum()
    }

    /// Theme names in sidebar order.
    pub fn theme_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains_theme(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Notes under `name`, or `None` for an unknown theme.
    pub fn notes(&self, name: &str) -> Option<&[Note]> {
        self.position(name)
            .map(|idx| self.entries[idx].notes.as_slice())
    }

    pub fn notes_mut(&mut self, name: &str) -> Option<&mut Vec<Note>> {
        let idx = self.position(name)?;
        Some(&mut self.entries[idx].notes)
    }

    /// Appends an empty theme. Returns `false` when the name already exists.
    pub fn insert_theme(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains_theme(&name) {
            return false;
        }
        self.entries.push(ThemeEntry {
            name,
            notes: Vec::new(),
        });
        true
    }

    /// Sets the notes of a theme, appending the theme when it is new.
    ///
    /// An existing theme keeps its position.
    pub fn set_theme(&mut self, name: impl Into<String>, notes: Vec<Note>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].notes = notes,
            None => self.entries.push(ThemeEntry { name, notes }),
        }
    }

    /// Removes a theme with all its notes.
    pub fn remove_theme(&mut self, name: &str) -> Option<Vec<Note>> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx).notes)
    }

    /// Moves the notes of `old` under `new`, placing `new` last.
    ///
    /// Returns `false` (and changes nothing) when `old` is unknown or `new`
    /// already exists.
    pub fn rename_theme(&mut self, old: &str, new: impl Into<String>) -> bool {
        let new = new.into();
        if self.contains_theme(&new) {
            return false;
        }
        let Some(notes) = self.remove_theme(old) else {
            return false;
        };
        self.entries.push(ThemeEntry { name: new, notes });
        true
    }

    /// Shallow merge: every theme of `other` replaces or appends.
    pub fn merge(&mut self, other: Notebook) {
        for entry in other.entries {
            self.set_theme(entry.name, entry.notes);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

impl Serialize for Notebook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.notes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Notebook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NotebookVisitor)
    }
}

struct NotebookVisitor;

impl<'de> Visitor<'de> for NotebookVisitor {
    type Value = Notebook;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "a map of theme name to note list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut notebook = Notebook::new();
        while let Some((name, notes)) = access.next_entry::<String, Vec<Note>>()? {
            if name.trim().is_empty() {
                return Err(de::Error::custom("theme name must not be empty"));
            }
            notebook.set_theme(name, notes);
        }
        Ok(notebook)
    }
}
