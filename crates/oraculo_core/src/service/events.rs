//! Store change notifications.
//!
//! Adapters subscribe a [`StoreListener`] and re-render from the
//! [`StoreView`] they receive; there is no diffing.

use crate::model::editor::EditorSession;
use crate::model::note::Note;
use crate::model::notebook::Notebook;
use crate::model::theme::{display_title, NO_THEME_SELECTED};

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Persisted notebook was (re)loaded.
    Loaded,
    /// A theme was added, renamed or deleted.
    ThemesChanged,
    ActiveThemeChanged,
    NotesChanged { theme: String },
    /// Editor opened, closed or its drafts changed.
    EditorChanged,
}

/// Read-only snapshot handed to listeners.
#[derive(Debug, Clone, Copy)]
pub struct StoreView<'a> {
    pub(crate) notebook: &'a Notebook,
    pub(crate) active_theme: Option<&'a str>,
    pub(crate) editor: &'a EditorSession,
}

impl<'a> StoreView<'a> {
    pub fn notebook(&self) -> &'a Notebook {
        self.notebook
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.notebook.theme_names()
    }

    pub fn active_theme(&self) -> Option<&'a str> {
        self.active_theme
    }

    /// Heading for the notes panel.
    pub fn display_title(&self) -> String {
        self.active_theme
            .map(display_title)
            .unwrap_or_else(|| NO_THEME_SELECTED.to_string())
    }

    /// Notes of the active theme; empty when none is active.
    pub fn active_notes(&self) -> &'a [Note] {
        self.active_theme
            .and_then(|theme| self.notebook.notes(theme))
            .unwrap_or(&[])
    }

    pub fn editor(&self) -> &'a EditorSession {
        self.editor
    }
}

/// Receives every store event after the in-memory mutation.
pub trait StoreListener {
    fn on_store_event(&mut self, event: &StoreEvent, view: &StoreView<'_>);
}
