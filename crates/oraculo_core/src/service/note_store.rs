//! Note store controller: themes, notes, search and the editor session.
//!
//! # Responsibility
//! - Own the in-memory notebook, the active theme and the editor state.
//! - Run every mutation as mutate -> notify listeners -> persist.
//! - Turn persistence failures into non-blocking warnings.
//!
//! # Invariants
//! - Theme names are trimmed, non-empty and unique.
//! - A failed validation changes nothing.
//! - A failed persist never rolls back the in-memory mutation.
//! - Index-based note actions always address the unfiltered theme list.

use crate::model::editor::{EditorField, EditorMode, EditorSession};
use crate::model::note::{Note, NoteValidationError};
use crate::model::notebook::Notebook;
use crate::model::theme::{display_title, normalize_theme_name, NO_THEME_SELECTED};
use crate::repo::notebook_repo::NotebookRepository;
use crate::richtext::highlight::{
    apply_highlight, resolve_highlight_color, HighlightError, SelectionRange,
    DEFAULT_HIGHLIGHT_COLOR,
};
use crate::search::filter::{search_notes, SearchHit};
use crate::service::events::{StoreEvent, StoreListener, StoreView};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// User-facing validation failures. `Display` is the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptyThemeName,
    DuplicateTheme(String),
    UnknownTheme(String),
    /// Rename prompt returned a blank name.
    RenameCancelled,
    NoActiveTheme,
    InvalidNote(NoteValidationError),
    NoteIndexOutOfRange {
        theme: String,
        index: usize,
        len: usize,
    },
    EditorClosed,
    NoFocusedField,
    /// Highlighting is only available in the content field.
    FieldNotFormattable(EditorField),
    Highlight(HighlightError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyThemeName => write!(f, "please enter a theme name"),
            Self::DuplicateTheme(name) => write!(f, "theme `{name}` already exists"),
            Self::UnknownTheme(name) => write!(f, "theme `{name}` does not exist"),
            Self::RenameCancelled => write!(f, "rename cancelled"),
            Self::NoActiveTheme => write!(f, "please select a theme first"),
            Self::InvalidNote(err) => write!(f, "{err}"),
            Self::NoteIndexOutOfRange { theme, index, len } => write!(
                f,
                "note #{index} does not exist in theme `{theme}` ({len} notes)"
            ),
            Self::EditorClosed => write!(f, "the note editor is not open"),
            Self::NoFocusedField => {
                write!(f, "click into the note content before changing colors")
            }
            Self::FieldNotFormattable(_) => {
                write!(f, "colors can only be applied to the note content")
            }
            Self::Highlight(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote(err) => Some(err),
            Self::Highlight(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidNote(value)
    }
}

impl From<HighlightError> for StoreError {
    fn from(value: HighlightError) -> Self {
        Self::Highlight(value)
    }
}

/// Which persistence step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Persisted data was unreadable; the store started empty.
    LoadFailed,
    /// The latest mutation lives in memory only.
    SaveFailed,
}

/// Non-blocking persistence warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWarning {
    pub kind: WarningKind,
    pub message: String,
}

/// Single-session note store over a [`NotebookRepository`].
pub struct NoteStore<R: NotebookRepository> {
    repo: R,
    notebook: Notebook,
    active_theme: Option<String>,
    editor: EditorSession,
    highlight_color: String,
    listeners: Vec<Box<dyn StoreListener>>,
    warnings: Vec<StoreWarning>,
}

impl<R: NotebookRepository> NoteStore<R> {
    /// Creates an empty store. Call [`NoteStore::load_all`] to read persisted data.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notebook: Notebook::new(),
            active_theme: None,
            editor: EditorSession::default(),
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            listeners: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Sets the highlight color, falling back to the default when invalid.
    pub fn with_highlight_color(mut self, color: &str) -> Self {
        self.highlight_color = resolve_highlight_color(Some(color));
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) {
        self.listeners.push(listener);
    }

    /// Replaces the in-memory notebook with the persisted one.
    ///
    /// Never fails: unreadable data yields an empty store plus a
    /// [`WarningKind::LoadFailed`] warning. Nothing is written back.
    pub fn load_all(&mut self) {
        let mut notebook = Notebook::new();
        match self.repo.load() {
            Ok(Some(persisted)) => notebook.merge(persisted),
            Ok(None) => {}
            Err(err) => {
                warn!(
                    "event=store_load module=service status=error error_code=load_failed error={}",
                    err
                );
                self.warnings.push(StoreWarning {
                    kind: WarningKind::LoadFailed,
                    message: format!("saved notes could not be read and were ignored: {err}"),
                });
            }
        }

        info!(
            "event=store_load module=service status=ok themes={} notes={}",
            notebook.len(),
            notebook.note_count()
        );
        self.notebook = notebook;
        self.active_theme = None;
        self.editor.close();
        self.notify(StoreEvent::Loaded);
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.notebook.theme_names()
    }

    pub fn active_theme(&self) -> Option<&str> {
        self.active_theme.as_deref()
    }

    /// Heading for the notes panel.
    pub fn display_title(&self) -> String {
        self.active_theme
            .as_deref()
            .map(display_title)
            .unwrap_or_else(|| NO_THEME_SELECTED.to_string())
    }

    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    pub fn view(&self) -> StoreView<'_> {
        StoreView {
            notebook: &self.notebook,
            active_theme: self.active_theme.as_deref(),
            editor: &self.editor,
        }
    }

    /// Drains pending persistence warnings.
    pub fn take_warnings(&mut self) -> Vec<StoreWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Makes `name` active. Switching to another theme closes the editor.
    pub fn select_theme(&mut self, name: &str) -> StoreResult<()> {
        if !self.notebook.contains_theme(name) {
            return Err(StoreError::UnknownTheme(name.to_string()));
        }
        if self.active_theme.as_deref() != Some(name) {
            self.close_editor_for_switch();
        }
        self.active_theme = Some(name.to_string());
        self.notify(StoreEvent::ActiveThemeChanged);
        Ok(())
    }

    pub fn list_notes(&self, theme: &str) -> StoreResult<&[Note]> {
        self.notebook
            .notes(theme)
            .ok_or_else(|| StoreError::UnknownTheme(theme.to_string()))
    }

    /// Notes of the active theme.
    pub fn active_notes(&self) -> StoreResult<&[Note]> {
        let theme = self.active_theme.as_deref().ok_or(StoreError::NoActiveTheme)?;
        self.list_notes(theme)
    }

    /// Appends a note (`index = None`) or overwrites the note at `index`.
    ///
    /// Fields are trimmed. Returns the note's index in the theme list.
    pub fn create_or_update_note(
        &mut self,
        theme: &str,
        index: Option<usize>,
        title: &str,
        content: &str,
    ) -> StoreResult<usize> {
        let note = Note::from_input(title, content)?;
        let notes = self
            .notebook
            .notes_mut(theme)
            .ok_or_else(|| StoreError::UnknownTheme(theme.to_string()))?;

        let index = match index {
            Some(index) => {
                let len = notes.len();
                let slot = notes.get_mut(index).ok_or(StoreError::NoteIndexOutOfRange {
                    theme: theme.to_string(),
                    index,
                    len,
                })?;
                *slot = note;
                index
            }
            None => {
                notes.push(note);
                notes.len() - 1
            }
        };

        debug!(
            "event=note_save module=service status=ok index={} title_len={} content_len={}",
            index,
            title.len(),
            content.len()
        );
        self.commit(StoreEvent::NotesChanged {
            theme: theme.to_string(),
        });
        Ok(index)
    }

    /// Removes the note at `index`; later notes shift down by one.
    ///
    /// An editor open on the active theme keeps pointing at the same note,
    /// or closes when that note is the one removed.
    pub fn delete_note(&mut self, theme: &str, index: usize) -> StoreResult<Note> {
        let notes = self
            .notebook
            .notes_mut(theme)
            .ok_or_else(|| StoreError::UnknownTheme(theme.to_string()))?;
        if index >= notes.len() {
            return Err(StoreError::NoteIndexOutOfRange {
                theme: theme.to_string(),
                index,
                len: notes.len(),
            });
        }
        let removed = notes.remove(index);

        debug!("event=note_delete module=service status=ok index={index}");
        if self.active_theme.as_deref() == Some(theme) && self.editor.note_removed(index) {
            self.notify(StoreEvent::EditorChanged);
        }
        self.commit(StoreEvent::NotesChanged {
            theme: theme.to_string(),
        });
        Ok(removed)
    }

    /// Adds an empty theme and makes it active, closing any open editor.
    /// Returns the trimmed name.
    pub fn add_theme(&mut self, name: &str) -> StoreResult<String> {
        let name = normalize_theme_name(name).map_err(|_| StoreError::EmptyThemeName)?;
        if !self.notebook.insert_theme(name.clone()) {
            return Err(StoreError::DuplicateTheme(name));
        }
        self.close_editor_for_switch();
        self.active_theme = Some(name.clone());

        info!(
            "event=theme_add module=service status=ok themes={}",
            self.notebook.len()
        );
        self.notify(StoreEvent::ThemesChanged);
        self.commit(StoreEvent::ActiveThemeChanged);
        Ok(name)
    }

    /// Moves the notes of `old` under `new`. Returns the trimmed new name.
    ///
    /// A blank `new` means the rename prompt was cancelled.
    pub fn rename_theme(&mut self, old: &str, new: &str) -> StoreResult<String> {
        let new = normalize_theme_name(new).map_err(|_| StoreError::RenameCancelled)?;
        if self.notebook.contains_theme(&new) {
            return Err(StoreError::DuplicateTheme(new));
        }
        if !self.notebook.rename_theme(old, new.clone()) {
            return Err(StoreError::UnknownTheme(old.to_string()));
        }

        let was_active = self.active_theme.as_deref() == Some(old);
        if was_active {
            self.active_theme = Some(new.clone());
        }

        info!("event=theme_rename module=service status=ok was_active={was_active}");
        if was_active {
            self.notify(StoreEvent::ActiveThemeChanged);
        }
        self.commit(StoreEvent::ThemesChanged);
        Ok(new)
    }

    /// Removes a theme and all its notes. Callers confirm with the user first.
    pub fn delete_theme(&mut self, name: &str) -> StoreResult<Vec<Note>> {
        let removed = self
            .notebook
            .remove_theme(name)
            .ok_or_else(|| StoreError::UnknownTheme(name.to_string()))?;

        let was_active = self.active_theme.as_deref() == Some(name);
        if was_active {
            self.active_theme = None;
            self.editor.close();
        }

        info!(
            "event=theme_delete module=service status=ok notes_removed={} was_active={}",
            removed.len(),
            was_active
        );
        if was_active {
            self.notify(StoreEvent::ActiveThemeChanged);
        }
        self.commit(StoreEvent::ThemesChanged);
        Ok(removed)
    }

    /// Case-insensitive substring search over one theme.
    ///
    /// Each hit carries the note's unfiltered index, so edit/delete actions
    /// taken from the results target the right note.
    pub fn search(&self, theme: &str, term: &str) -> StoreResult<Vec<SearchHit>> {
        let notes = self.list_notes(theme)?;
        let hits = search_notes(notes, term);
        debug!(
            "event=note_search module=service status=ok term_len={} hits={} total={}",
            term.len(),
            hits.len(),
            notes.len()
        );
        Ok(hits)
    }

    /// Opens the editor on the active theme: `None` creates, `Some(i)` edits.
    pub fn open_editor(&mut self, index: Option<usize>) -> StoreResult<()> {
        let theme = self.active_theme.as_deref().ok_or(StoreError::NoActiveTheme)?;
        let notes = self.list_notes(theme)?;
        match index {
            Some(index) => {
                let note = notes.get(index).ok_or(StoreError::NoteIndexOutOfRange {
                    theme: theme.to_string(),
                    index,
                    len: notes.len(),
                })?;
                let (title, content) = (note.title.clone(), note.content.clone());
                self.editor.open(EditorMode::Editing(index), title, content);
            }
            None => self
                .editor
                .open(EditorMode::Creating, String::new(), String::new()),
        }
        self.notify(StoreEvent::EditorChanged);
        Ok(())
    }

    pub fn focus_field(&mut self, field: EditorField) -> StoreResult<()> {
        self.ensure_editor_open()?;
        self.editor.focus(field);
        Ok(())
    }

    /// Replaces a draft field. Does not move the focus.
    pub fn set_draft(&mut self, field: EditorField, value: impl Into<String>) -> StoreResult<()> {
        self.ensure_editor_open()?;
        self.editor.set_draft(field, value.into());
        self.notify(StoreEvent::EditorChanged);
        Ok(())
    }

    /// Wraps `selection` of the focused content draft in the highlight color.
    ///
    /// Returns the new draft content. The selection is consumed either way.
    pub fn apply_highlight(&mut self, selection: SelectionRange) -> StoreResult<String> {
        self.ensure_editor_open()?;
        let field = self.editor.focused_field().ok_or(StoreError::NoFocusedField)?;
        if field != EditorField::Content {
            return Err(StoreError::FieldNotFormattable(field));
        }

        let highlighted =
            apply_highlight(self.editor.draft(field), selection, &self.highlight_color)?;
        self.editor.set_draft(field, highlighted.clone());
        self.notify(StoreEvent::EditorChanged);
        Ok(highlighted)
    }

    /// Saves the drafts into the active theme and closes the editor.
    ///
    /// On any error the editor stays open with its drafts intact.
    pub fn save_editor(&mut self) -> StoreResult<usize> {
        self.ensure_editor_open()?;
        let theme = self
            .active_theme
            .clone()
            .ok_or(StoreError::NoActiveTheme)?;
        let title = self.editor.draft_title().to_string();
        let content = self.editor.draft_content().to_string();

        let index =
            self.create_or_update_note(&theme, self.editor.editing_index(), &title, &content)?;
        self.editor.close();
        self.notify(StoreEvent::EditorChanged);
        Ok(index)
    }

    /// Closes the editor, discarding drafts.
    pub fn cancel_editor(&mut self) {
        if self.editor.is_open() {
            self.editor.close();
            self.notify(StoreEvent::EditorChanged);
        }
    }

    /// The editor is bound to the active theme's list; switching drops it.
    fn close_editor_for_switch(&mut self) {
        if self.editor.is_open() {
            self.editor.close();
            self.notify(StoreEvent::EditorChanged);
        }
    }

    fn ensure_editor_open(&self) -> StoreResult<()> {
        if self.editor.is_open() {
            Ok(())
        } else {
            Err(StoreError::EditorClosed)
        }
    }

    fn commit(&mut self, event: StoreEvent) {
        self.notify(event);
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(err) = self.repo.save(&self.notebook) {
            warn!(
                "event=store_save module=service status=error error_code=save_failed error={}",
                err
            );
            self.warnings.push(StoreWarning {
                kind: WarningKind::SaveFailed,
                message: format!("changes are kept in this session but were not saved: {err}"),
            });
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        let view = self.view();
        for listener in &mut listeners {
            listener.on_store_event(&event, &view);
        }
        self.listeners = listeners;
    }
}
