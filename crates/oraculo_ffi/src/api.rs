//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per store use-case to Dart via FRB.
//! - Shape results into flat envelopes with user-facing messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized: each one loads, mutates and persists the whole
//!   notebook while holding the store lock.
//! - Note indices in responses always address the unfiltered theme list.

use log::error;
use oraculo_core::db::open_db;
use oraculo_core::{
    apply_highlight, core_version as core_version_inner, escape_html,
    init_logging as init_logging_inner, ping as ping_inner, resolve_highlight_color,
    strip_markup, LocalStorageNotebookRepository, Note, NoteStore, OraculoConfig,
    SelectionRange, SqliteLocalStorage, StoreError,
};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static CONFIG: OnceLock<OraculoConfig> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One note card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    /// Position in the theme's full list; use it for edit/delete.
    pub index: u32,
    pub title: String,
    /// Title escaped for HTML rendering.
    pub title_html: String,
    /// Stored rich-text content, unescaped.
    pub content_html: String,
    /// Content without markup.
    pub content_plain: String,
}

/// Note list envelope (full list or search results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<NoteView>,
    /// Non-blocking persistence warnings.
    pub warnings: Vec<String>,
}

/// Sidebar envelope: theme names in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemesResponse {
    pub ok: bool,
    pub message: String,
    pub themes: Vec<String>,
    pub warnings: Vec<String>,
}

/// Note mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub message: String,
    /// Index of the saved note; `None` on failure or delete.
    pub index: Option<u32>,
    pub warnings: Vec<String>,
}

/// Highlight envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResponse {
    pub ok: bool,
    pub message: String,
    /// New content on success, the input content otherwise.
    pub content: String,
}

/// Loads every theme name.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_load_all() -> ThemesResponse {
    notes_load_all_in(&entry_db_path())
}

/// Lists the notes of one theme.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(theme: String) -> NotesResponse {
    notes_list_in(&entry_db_path(), &theme)
}

/// Creates (`index = None`) or overwrites a note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_upsert(
    theme: String,
    index: Option<u32>,
    title: String,
    content: String,
) -> NoteActionResponse {
    notes_upsert_in(&entry_db_path(), &theme, index, &title, &content)
}

/// Deletes the note at `index` of the full theme list.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(theme: String, index: u32) -> NoteActionResponse {
    notes_delete_in(&entry_db_path(), &theme, index)
}

/// Searches one theme; each item keeps its full-list index.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(theme: String, term: String) -> NotesResponse {
    notes_search_in(&entry_db_path(), &theme, &term)
}

#[flutter_rust_bridge::frb(sync)]
pub fn theme_add(name: String) -> ThemesResponse {
    theme_add_in(&entry_db_path(), &name)
}

/// Renames a theme. A blank `new_name` is treated as a cancelled prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_rename(old_name: String, new_name: String) -> ThemesResponse {
    theme_rename_in(&entry_db_path(), &old_name, &new_name)
}

/// Deletes a theme with its notes. The UI must confirm before calling.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_delete(name: String) -> ThemesResponse {
    theme_delete_in(&entry_db_path(), &name)
}

/// Wraps `[start, end)` of the visible text of `content` in a color span.
///
/// `color = None` uses the configured highlight color.
#[flutter_rust_bridge::frb(sync)]
pub fn note_apply_highlight(
    content: String,
    start: u32,
    end: u32,
    color: Option<String>,
) -> HighlightResponse {
    let color = match color {
        Some(color) => resolve_highlight_color(Some(color.as_str())),
        None => config().highlight_color.clone(),
    };
    let selection = SelectionRange::new(start as usize, end as usize);
    match apply_highlight(&content, selection, &color) {
        Ok(highlighted) => HighlightResponse {
            ok: true,
            message: String::new(),
            content: highlighted,
        },
        Err(err) => HighlightResponse {
            ok: false,
            message: err.to_string(),
            content,
        },
    }
}

type SqliteStore<'conn> = NoteStore<LocalStorageNotebookRepository<SqliteLocalStorage<'conn>>>;

fn notes_load_all_in(db_path: &Path) -> ThemesResponse {
    themes_response(with_store(db_path, |_| Ok::<_, StoreError>(())))
}

fn notes_list_in(db_path: &Path, theme: &str) -> NotesResponse {
    notes_response(with_store(db_path, |store| -> Result<Vec<NoteView>, String> {
        let notes = store.list_notes(theme).map_err(|err| err.to_string())?;
        notes
            .iter()
            .enumerate()
            .map(|(index, note)| to_note_view(index, note))
            .collect()
    }))
}

fn notes_search_in(db_path: &Path, theme: &str, term: &str) -> NotesResponse {
    notes_response(with_store(db_path, |store| -> Result<Vec<NoteView>, String> {
        store
            .search(theme, term)
            .map_err(|err| err.to_string())?
            .iter()
            .map(|hit| to_note_view(hit.index, &hit.note))
            .collect()
    }))
}

fn notes_upsert_in(
    db_path: &Path,
    theme: &str,
    index: Option<u32>,
    title: &str,
    content: &str,
) -> NoteActionResponse {
    let result = with_store(db_path, |store| -> Result<u32, String> {
        let saved = store
            .create_or_update_note(theme, index.map(|value| value as usize), title, content)
            .map_err(|err| err.to_string())?;
        wire_index(saved)
    });
    match result {
        Ok(Success {
            value: saved,
            warnings,
            ..
        }) => NoteActionResponse {
            ok: true,
            message: if index.is_some() {
                "Note updated.".to_string()
            } else {
                "Note created.".to_string()
            },
            index: Some(saved),
            warnings,
        },
        Err(Failure { message, warnings }) => NoteActionResponse {
            ok: false,
            message,
            index: None,
            warnings,
        },
    }
}

fn notes_delete_in(db_path: &Path, theme: &str, index: u32) -> NoteActionResponse {
    match with_store(db_path, |store| store.delete_note(theme, index as usize)) {
        Ok(Success { warnings, .. }) => NoteActionResponse {
            ok: true,
            message: "Note deleted.".to_string(),
            index: None,
            warnings,
        },
        Err(Failure { message, warnings }) => NoteActionResponse {
            ok: false,
            message,
            index: None,
            warnings,
        },
    }
}

fn theme_add_in(db_path: &Path, name: &str) -> ThemesResponse {
    themes_response(with_store(db_path, |store| store.add_theme(name).map(|_| ())))
}

fn theme_rename_in(db_path: &Path, old_name: &str, new_name: &str) -> ThemesResponse {
    themes_response(with_store(db_path, |store| {
        store.rename_theme(old_name, new_name).map(|_| ())
    }))
}

fn theme_delete_in(db_path: &Path, name: &str) -> ThemesResponse {
    themes_response(with_store(db_path, |store| {
        store.delete_theme(name).map(|_| ())
    }))
}

/// Use-case value plus the sidebar and warnings after the call.
struct Success<T> {
    value: T,
    themes: Vec<String>,
    warnings: Vec<String>,
}

/// User-facing message plus any warnings queued before the failure.
struct Failure {
    message: String,
    warnings: Vec<String>,
}

impl Failure {
    fn bare(message: String) -> Self {
        Self {
            message,
            warnings: Vec::new(),
        }
    }
}

/// Runs one use-case against a freshly loaded store.
///
/// Load warnings are drained before `f` runs so they reach the caller even
/// when the use-case itself fails.
fn with_store<T, E: Display>(
    db_path: &Path,
    f: impl FnOnce(&mut SqliteStore<'_>) -> Result<T, E>,
) -> Result<Success<T>, Failure> {
    let _guard = STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(db_path).map_err(|err| {
        error!("event=ffi_call module=ffi status=error error_code=db_open_failed error={err}");
        Failure::bare(format!("could not open notes storage: {err}"))
    })?;
    let storage = SqliteLocalStorage::try_new(&conn)
        .map_err(|err| Failure::bare(format!("could not open notes storage: {err}")))?;
    let mut store = NoteStore::new(LocalStorageNotebookRepository::new(storage))
        .with_highlight_color(&config().highlight_color);
    store.load_all();
    let mut warnings = drain_warnings(&mut store);

    let value = match f(&mut store) {
        Ok(value) => value,
        Err(err) => {
            warnings.extend(drain_warnings(&mut store));
            return Err(Failure {
                message: err.to_string(),
                warnings,
            });
        }
    };
    warnings.extend(drain_warnings(&mut store));
    let themes = store.theme_names().map(str::to_string).collect();
    Ok(Success {
        value,
        themes,
        warnings,
    })
}

fn drain_warnings(store: &mut SqliteStore<'_>) -> Vec<String> {
    store
        .take_warnings()
        .into_iter()
        .map(|warning| warning.message)
        .collect()
}

fn themes_response(result: Result<Success<()>, Failure>) -> ThemesResponse {
    match result {
        Ok(Success {
            themes, warnings, ..
        }) => ThemesResponse {
            ok: true,
            message: String::new(),
            themes,
            warnings,
        },
        Err(Failure { message, warnings }) => ThemesResponse {
            ok: false,
            message,
            themes: Vec::new(),
            warnings,
        },
    }
}

fn notes_response(result: Result<Success<Vec<NoteView>>, Failure>) -> NotesResponse {
    match result {
        Ok(Success {
            value: items,
            warnings,
            ..
        }) => NotesResponse {
            ok: true,
            message: if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("{} note(s).", items.len())
            },
            items,
            warnings,
        },
        Err(Failure { message, warnings }) => NotesResponse {
            ok: false,
            message,
            items: Vec::new(),
            warnings,
        },
    }
}

/// Note index as sent over FFI.
fn wire_index(index: usize) -> Result<u32, String> {
    u32::try_from(index).map_err(|_| format!("note #{index} is beyond the supported range"))
}

fn to_note_view(index: usize, note: &Note) -> Result<NoteView, String> {
    Ok(NoteView {
        index: wire_index(index)?,
        title: note.title.clone(),
        title_html: escape_html(&note.title),
        content_html: note.content.clone(),
        content_plain: strip_markup(&note.content),
    })
}

fn config() -> &'static OraculoConfig {
    CONFIG.get_or_init(OraculoConfig::from_env)
}

fn entry_db_path() -> PathBuf {
    config().db_path.clone()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, note_apply_highlight, notes_delete_in, notes_list_in,
        notes_load_all_in, notes_search_in, notes_upsert_in, ping, theme_add_in,
        theme_delete_in, theme_rename_in, wire_index,
    };
    use oraculo_core::db::open_db;
    use oraculo_core::{LocalStorage, SqliteLocalStorage, STORAGE_KEY};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("notes.sqlite3");
        (dir, path)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn theme_lifecycle_updates_sidebar() {
        let (_dir, db) = temp_db();
        assert!(notes_load_all_in(&db).themes.is_empty());

        assert_eq!(theme_add_in(&db, "HTML").themes, vec!["HTML"]);
        assert_eq!(theme_add_in(&db, "CSS").themes, vec!["HTML", "CSS"]);

        let duplicate = theme_add_in(&db, "CSS");
        assert!(!duplicate.ok);
        assert!(duplicate.message.contains("already exists"));

        assert_eq!(
            theme_rename_in(&db, "HTML", "Markup").themes,
            vec!["CSS", "Markup"]
        );
        assert_eq!(theme_delete_in(&db, "CSS").themes, vec!["Markup"]);
        assert_eq!(notes_load_all_in(&db).themes, vec!["Markup"]);
    }

    #[test]
    fn search_results_keep_full_list_indices_for_delete() {
        let (_dir, db) = temp_db();
        theme_add_in(&db, "CSS");
        assert!(notes_upsert_in(&db, "CSS", None, "Flexbox", "one axis").ok);
        let created = notes_upsert_in(&db, "CSS", None, "Grid & <areas>", "two axes");
        assert_eq!(created.index, Some(1));

        let found = notes_search_in(&db, "CSS", "grid");
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].index, 1);
        assert_eq!(found.items[0].title_html, "Grid &amp; &lt;areas&gt;");

        assert!(notes_delete_in(&db, "CSS", found.items[0].index).ok);
        let remaining = notes_list_in(&db, "CSS");
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(remaining.items[0].title, "Flexbox");
    }

    #[test]
    fn upsert_reports_validation_messages() {
        let (_dir, db) = temp_db();
        theme_add_in(&db, "JS");

        let response = notes_upsert_in(&db, "JS", None, "title", "   ");
        assert!(!response.ok);
        assert_eq!(response.message, "please fill in the note content");

        let response = notes_upsert_in(&db, "JS", Some(4), "t", "c");
        assert!(!response.ok);
        assert!(response.message.contains("#4"));
    }

    #[test]
    fn highlight_returns_wrapped_content_or_input() {
        let ok = note_apply_highlight("abc".to_string(), 0, 1, Some("red".to_string()));
        assert!(ok.ok);
        assert_eq!(ok.content, r#"<span style="color: red;">a</span>bc"#);

        let failed = note_apply_highlight("abc".to_string(), 1, 1, None);
        assert!(!failed.ok);
        assert_eq!(failed.content, "abc");
    }

    fn write_raw_blob(db: &Path, raw: &str) {
        let conn = open_db(db).unwrap();
        let mut storage = SqliteLocalStorage::try_new(&conn).unwrap();
        storage.set_item(STORAGE_KEY, raw).unwrap();
    }

    #[test]
    fn load_warning_survives_failed_use_case() {
        let (_dir, db) = temp_db();
        write_raw_blob(&db, "{not json");

        let response = theme_rename_in(&db, "HTML", "Markup");
        assert!(!response.ok);
        assert!(response.message.contains("does not exist"));
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].contains("could not be read"));

        let listed = notes_list_in(&db, "HTML");
        assert!(!listed.ok);
        assert_eq!(listed.warnings.len(), 1);
    }

    #[test]
    fn load_warning_is_reported_on_success_too() {
        let (_dir, db) = temp_db();
        write_raw_blob(&db, "[]");

        let response = notes_load_all_in(&db);
        assert!(response.ok);
        assert!(response.themes.is_empty());
        assert_eq!(response.warnings.len(), 1);
    }

    #[test]
    fn wire_index_rejects_values_past_u32() {
        assert_eq!(wire_index(7), Ok(7));
        assert_eq!(wire_index(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert!(wire_index(u32::MAX as usize + 1)
            .unwrap_err()
            .contains("beyond the supported range"));
    }
}
