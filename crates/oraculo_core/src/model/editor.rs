//! Modal editor session state.
//!
//! State machine: `Closed -> Creating | Editing(index) -> Closed`.
//! Drafts and the focused field are reset on every closure.

/// What the open editor will do on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    /// Save appends a new note to the active theme.
    Creating,
    /// Save overwrites the note at this index of the active theme.
    Editing(usize),
}

/// Editor field that last received input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Content,
}

/// Editor modal state owned by the note store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    mode: EditorMode,
    focused_field: Option<EditorField>,
    draft_title: String,
    draft_content: String,
}

impl EditorSession {
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    /// Index being edited; `None` while creating or closed.
    pub fn editing_index(&self) -> Option<usize> {
        match self.mode {
            EditorMode::Editing(index) => Some(index),
            _ => None,
        }
    }

    pub fn focused_field(&self) -> Option<EditorField> {
        self.focused_field
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn draft_content(&self) -> &str {
        &self.draft_content
    }

    pub(crate) fn open(&mut self, mode: EditorMode, title: String, content: String) {
        self.mode = mode;
        self.focused_field = None;
        self.draft_title = title;
        self.draft_content = content;
    }

    pub(crate) fn close(&mut self) {
        *self = Self::default();
    }

    /// Keeps `Editing(i)` on the same note after note `removed` left the list.
    ///
    /// Closes the editor when the edited note itself was removed. Returns
    /// whether the session changed.
    pub(crate) fn note_removed(&mut self, removed: usize) -> bool {
        match self.mode {
            EditorMode::Editing(index) if index == removed => {
                self.close();
                true
            }
            EditorMode::Editing(index) if index > removed => {
                self.mode = EditorMode::Editing(index - 1);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn focus(&mut self, field: EditorField) {
        self.focused_field = Some(field);
    }

    pub(crate) fn set_draft(&mut self, field: EditorField, value: String) {
        match field {
            EditorField::Title => self.draft_title = value,
            EditorField::Content => self.draft_content = value,
        }
    }

    pub(crate) fn draft(&self, field: EditorField) -> &str {
        match field {
            EditorField::Title => &self.draft_title,
            EditorField::Content => &self.draft_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorField, EditorMode, EditorSession};

    #[test]
    fn close_resets_every_field() {
        let mut session = EditorSession::default();
        session.open(EditorMode::Editing(2), "t".into(), "c".into());
        session.focus(EditorField::Content);
        assert_eq!(session.editing_index(), Some(2));

        session.close();
        assert_eq!(session, EditorSession::default());
        assert!(!session.is_open());
    }

    #[test]
    fn note_removed_follows_the_edited_note() {
        let mut session = EditorSession::default();
        session.open(EditorMode::Editing(2), "t".into(), "c".into());

        assert!(!session.note_removed(3));
        assert_eq!(session.mode(), EditorMode::Editing(2));

        assert!(session.note_removed(0));
        assert_eq!(session.mode(), EditorMode::Editing(1));
        assert_eq!(session.draft_title(), "t");

        assert!(session.note_removed(1));
        assert!(!session.is_open());

        session.open(EditorMode::Creating, String::new(), String::new());
        assert!(!session.note_removed(0));
        assert_eq!(session.mode(), EditorMode::Creating);
    }
}
