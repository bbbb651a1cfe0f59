//! Core domain logic for Oraculo notes.
//! This crate is the single source of truth for theme and note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod richtext;
pub mod search;
pub mod service;

pub use config::OraculoConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::editor::{EditorField, EditorMode, EditorSession};
pub use model::note::{Note, NoteValidationError};
pub use model::notebook::Notebook;
pub use model::theme::{display_title, NO_THEME_SELECTED};
pub use repo::local_storage::{
    LocalStorage, MemoryLocalStorage, RepoError, RepoResult, SqliteLocalStorage,
};
pub use repo::notebook_repo::{LocalStorageNotebookRepository, NotebookRepository, STORAGE_KEY};
pub use richtext::escape::escape_html;
pub use richtext::highlight::{
    apply_highlight, resolve_highlight_color, HighlightError, SelectionRange,
    DEFAULT_HIGHLIGHT_COLOR,
};
pub use search::filter::{search_notes, strip_markup, SearchHit};
pub use service::events::{StoreEvent, StoreListener, StoreView};
pub use service::note_store::{NoteStore, StoreError, StoreResult, StoreWarning, WarningKind};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
