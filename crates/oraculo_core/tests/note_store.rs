use oraculo_core::{
    LocalStorage, LocalStorageNotebookRepository, MemoryLocalStorage, Note, NoteStore,
    NoteValidationError, NotebookRepository, StoreError, StoreEvent, StoreListener, StoreView,
    WarningKind, STORAGE_KEY,
};
use std::cell::RefCell;
use std::rc::Rc;

type MemoryStore = NoteStore<LocalStorageNotebookRepository<MemoryLocalStorage>>;

fn empty_store() -> MemoryStore {
    store_with(MemoryLocalStorage::new())
}

fn store_with(storage: MemoryLocalStorage) -> MemoryStore {
    let mut store = NoteStore::new(LocalStorageNotebookRepository::new(storage));
    store.load_all();
    store
}

fn titles(store: &MemoryStore, theme: &str) -> Vec<String> {
    store
        .list_notes(theme)
        .unwrap()
        .iter()
        .map(|note| note.title.clone())
        .collect()
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<(StoreEvent, Option<String>)>>>,
}

impl StoreListener for Recorder {
    fn on_store_event(&mut self, event: &StoreEvent, view: &StoreView<'_>) {
        self.events
            .borrow_mut()
            .push((event.clone(), view.active_theme().map(str::to_string)));
    }
}

#[test]
fn html_scenario_create_search_delete() {
    let mut store = empty_store();
    store.add_theme("HTML").unwrap();
    assert_eq!(store.theme_names().collect::<Vec<_>>(), vec!["HTML"]);
    assert!(store.list_notes("HTML").unwrap().is_empty());

    store
        .create_or_update_note("HTML", None, "T1", "C1")
        .unwrap();
    assert_eq!(store.list_notes("HTML").unwrap(), &[Note::new("T1", "C1")]);

    let hits = store.search("HTML", "t1").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 0);
    assert_eq!(hits[0].note, Note::new("T1", "C1"));

    store.delete_note("HTML", 0).unwrap();
    assert!(store.list_notes("HTML").unwrap().is_empty());
}

#[test]
fn delete_from_filtered_view_removes_the_matched_note_only() {
    let mut store = empty_store();
    store.add_theme("CSS").unwrap();
    store
        .create_or_update_note("CSS", None, "Flexbox", "one axis")
        .unwrap();
    store
        .create_or_update_note("CSS", None, "Grid", "two axes")
        .unwrap();

    let hits = store.search("CSS", "grid").unwrap();
    assert_eq!(hits.len(), 1);
    let removed = store.delete_note("CSS", hits[0].index).unwrap();

    assert_eq!(removed.title, "Grid");
    assert_eq!(titles(&store, "CSS"), vec!["Flexbox"]);
}

#[test]
fn edit_from_filtered_view_targets_underlying_note() {
    let mut store = empty_store();
    store.add_theme("CSS").unwrap();
    for (title, content) in [("a", "x"), ("b", "needle"), ("c", "y")] {
        store
            .create_or_update_note("CSS", None, title, content)
            .unwrap();
    }

    let hit = store.search("CSS", "NEEDLE").unwrap().remove(0);
    store.open_editor(Some(hit.index)).unwrap();
    assert_eq!(store.editor().draft_title(), "b");
    store
        .set_draft(oraculo_core::EditorField::Content, "found")
        .unwrap();
    store.save_editor().unwrap();

    assert_eq!(titles(&store, "CSS"), vec!["a", "b", "c"]);
    assert_eq!(store.list_notes("CSS").unwrap()[1].content, "found");
}

#[test]
fn search_matches_substring_of_title_and_forgets_deleted_notes() {
    let mut store = empty_store();
    store.add_theme("Rust").unwrap();
    store
        .create_or_update_note("Rust", None, "Ownership rules", "move semantics")
        .unwrap();

    assert_eq!(store.search("Rust", "ship r").unwrap().len(), 1);
    assert_eq!(store.search("Rust", "SEMANTIC").unwrap().len(), 1);

    store.delete_note("Rust", 0).unwrap();
    assert!(store.search("Rust", "ship").unwrap().is_empty());
}

#[test]
fn search_ignores_highlight_markup() {
    let mut store = empty_store();
    store.add_theme("HTML").unwrap();
    store
        .create_or_update_note(
            "HTML",
            None,
            "colors",
            r#"<span style="color: #000000;">dark</span> text"#,
        )
        .unwrap();

    assert!(store.search("HTML", "color:").unwrap().is_empty());
    assert_eq!(store.search("HTML", "dark text").unwrap().len(), 1);
}

#[test]
fn editing_in_place_keeps_length_and_positions() {
    let mut store = empty_store();
    store.add_theme("JS").unwrap();
    for title in ["one", "two", "three"] {
        store.create_or_update_note("JS", None, title, "body").unwrap();
    }

    let index = store
        .create_or_update_note("JS", Some(1), "TWO", "edited")
        .unwrap();
    assert_eq!(index, 1);
    assert_eq!(titles(&store, "JS"), vec!["one", "TWO", "three"]);
}

#[test]
fn create_or_update_validates_input_and_index() {
    let mut store = empty_store();
    store.add_theme("JS").unwrap();

    assert_eq!(
        store.create_or_update_note("JS", None, "  ", "body"),
        Err(StoreError::InvalidNote(NoteValidationError::EmptyTitle))
    );
    assert_eq!(
        store.create_or_update_note("JS", None, "title", ""),
        Err(StoreError::InvalidNote(NoteValidationError::EmptyContent))
    );
    assert_eq!(
        store.create_or_update_note("JS", Some(0), "t", "c"),
        Err(StoreError::NoteIndexOutOfRange {
            theme: "JS".to_string(),
            index: 0,
            len: 0
        })
    );
    assert_eq!(
        store.create_or_update_note("Nope", None, "t", "c"),
        Err(StoreError::UnknownTheme("Nope".to_string()))
    );
    assert!(store.list_notes("JS").unwrap().is_empty());
}

#[test]
fn add_theme_rejects_empty_and_duplicate_names() {
    let mut store = empty_store();
    assert_eq!(store.add_theme("   "), Err(StoreError::EmptyThemeName));
    assert_eq!(store.add_theme(" HTML ").unwrap(), "HTML");
    assert_eq!(
        store.add_theme("HTML"),
        Err(StoreError::DuplicateTheme("HTML".to_string()))
    );
    // exact match only
    assert_eq!(store.add_theme("html").unwrap(), "html");
    assert_eq!(store.active_theme(), Some("html"));
}

#[test]
fn delete_then_add_theme_starts_empty() {
    let mut store = empty_store();
    store.add_theme("CSS").unwrap();
    store.create_or_update_note("CSS", None, "t", "c").unwrap();

    let removed = store.delete_theme("CSS").unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(store.active_theme(), None);
    assert_eq!(store.display_title(), "No theme selected");

    store.add_theme("CSS").unwrap();
    assert!(store.list_notes("CSS").unwrap().is_empty());
}

#[test]
fn rename_active_theme_keeps_notes_and_activity() {
    let mut store = empty_store();
    store.add_theme("A").unwrap();
    store.create_or_update_note("A", None, "n1", "c1").unwrap();
    store.create_or_update_note("A", None, "n2", "c2").unwrap();
    store.add_theme("Other").unwrap();
    store.select_theme("A").unwrap();
    let before = store.list_notes("A").unwrap().to_vec();

    assert_eq!(store.rename_theme("A", " B ").unwrap(), "B");
    assert_eq!(store.active_theme(), Some("B"));
    assert_eq!(store.list_notes("B").unwrap(), before.as_slice());
    assert_eq!(store.active_notes().unwrap(), before.as_slice());
    assert_eq!(
        store.list_notes("A"),
        Err(StoreError::UnknownTheme("A".to_string()))
    );
    assert_eq!(store.theme_names().collect::<Vec<_>>(), vec!["Other", "B"]);
}

#[test]
fn rename_inactive_theme_leaves_active_pointer() {
    let mut store = empty_store();
    store.add_theme("A").unwrap();
    store.add_theme("B").unwrap();

    store.rename_theme("A", "C").unwrap();
    assert_eq!(store.active_theme(), Some("B"));
}

#[test]
fn rename_rejects_cancel_duplicate_and_unknown() {
    let mut store = empty_store();
    store.add_theme("A").unwrap();
    store.add_theme("B").unwrap();

    assert_eq!(store.rename_theme("A", ""), Err(StoreError::RenameCancelled));
    assert_eq!(
        store.rename_theme("A", "B"),
        Err(StoreError::DuplicateTheme("B".to_string()))
    );
    assert_eq!(
        store.rename_theme("A", "A"),
        Err(StoreError::DuplicateTheme("A".to_string()))
    );
    assert_eq!(
        store.rename_theme("Z", "Y"),
        Err(StoreError::UnknownTheme("Z".to_string()))
    );
    assert_eq!(store.theme_names().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[test]
fn every_mutation_is_persisted() {
    let mut storage = MemoryLocalStorage::new();
    {
        let mut store = NoteStore::new(LocalStorageNotebookRepository::new(&mut storage));
        store.load_all();
        store.add_theme("HTML").unwrap();
        store.create_or_update_note("HTML", None, "t", "c").unwrap();
        store.add_theme("Rust").unwrap();
        store.rename_theme("Rust", "Ferris").unwrap();
    }

    let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(
        raw,
        r#"{"HTML":[{"title":"t","content":"c"}],"Ferris":[]}"#
    );

    let reloaded = store_with(storage);
    assert_eq!(titles(&reloaded, "HTML"), vec!["t"]);
    assert_eq!(reloaded.active_theme(), None);
}

#[test]
fn save_of_loaded_notebook_round_trips() {
    let mut storage = MemoryLocalStorage::new();
    let raw = r#"{"B":[{"title":"x","content":"<i>y</i>"}],"A":[]}"#;
    storage.set_item(STORAGE_KEY, raw).unwrap();

    let store = store_with(storage.clone());
    let mut repo = LocalStorageNotebookRepository::new(MemoryLocalStorage::new());
    repo.save(store.notebook()).unwrap();
    assert_eq!(
        repo.into_inner().get_item(STORAGE_KEY).unwrap().as_deref(),
        Some(raw)
    );
}

#[test]
fn corrupt_storage_fails_soft_with_warning() {
    let mut storage = MemoryLocalStorage::new();
    storage.set_item(STORAGE_KEY, "[1, 2").unwrap();

    let mut store = store_with(storage);
    assert!(store.notebook().is_empty());
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::LoadFailed);
    assert!(store.take_warnings().is_empty());

    store.add_theme("fresh").unwrap();
    assert_eq!(store.active_theme(), Some("fresh"));
}

#[test]
fn quota_failure_keeps_session_state_and_warns() {
    let mut store = store_with(MemoryLocalStorage::with_quota(40));
    store.add_theme("HTML").unwrap();
    assert!(store.take_warnings().is_empty());

    store
        .create_or_update_note("HTML", None, "long title", "a body that does not fit")
        .unwrap();
    assert_eq!(titles(&store, "HTML"), vec!["long title"]);

    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::SaveFailed);
}

#[test]
fn select_theme_requires_known_name() {
    let mut store = empty_store();
    store.add_theme("A").unwrap();
    store.add_theme("B").unwrap();

    store.select_theme("A").unwrap();
    assert_eq!(store.display_title(), "A");
    assert_eq!(
        store.select_theme("C"),
        Err(StoreError::UnknownTheme("C".to_string()))
    );
    assert_eq!(store.active_theme(), Some("A"));
}

#[test]
fn listeners_see_state_after_each_mutation() {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    let mut store = empty_store();
    store.subscribe(Box::new(recorder));

    store.add_theme("HTML").unwrap();
    store.create_or_update_note("HTML", None, "t", "c").unwrap();
    store.delete_theme("HTML").unwrap();

    let recorded = events.borrow();
    assert_eq!(
        recorded.as_slice(),
        &[
            (StoreEvent::ThemesChanged, Some("HTML".to_string())),
            (StoreEvent::ActiveThemeChanged, Some("HTML".to_string())),
            (
                StoreEvent::NotesChanged {
                    theme: "HTML".to_string()
                },
                Some("HTML".to_string())
            ),
            (StoreEvent::ActiveThemeChanged, None),
            (StoreEvent::ThemesChanged, None),
        ]
    );
}
