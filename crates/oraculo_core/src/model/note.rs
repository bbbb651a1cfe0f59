//! Note domain model.
//!
//! # Invariants
//! - A persisted note has a non-blank title and a non-blank content.
//! - `content` may carry inline highlight markup; `title` is plain text.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A title + content pair stored under a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    /// Rich text; may contain `<span style="color: …;">` wrappers.
    pub content: String,
}

/// Validation failures for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "please fill in the note title"),
            Self::EmptyContent => write!(f, "please fill in the note content"),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Builds a note from already-trimmed field values.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Builds a note from raw editor input, trimming both fields first.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyContent` when a field is blank after trimming.
    pub fn from_input(title: &str, content: &str) -> Result<Self, NoteValidationError> {
        let note = Self::new(title.trim(), content.trim());
        note.validate()?;
        Ok(note)
    }

    /// Checks the write invariants without mutating the note.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        Ok(())
    }
}
