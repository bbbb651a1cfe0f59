//! Notebook blob repository.
//!
//! # Invariants
//! - The notebook is stored as one JSON object under [`STORAGE_KEY`].
//! - `save` always writes the full mapping.

use crate::model::notebook::Notebook;
use crate::repo::local_storage::{LocalStorage, RepoError, RepoResult};
use log::debug;

/// Fixed storage key of the persisted notebook.
pub const STORAGE_KEY: &str = "oraculoNotes";

/// Load/save contract for the whole notebook.
pub trait NotebookRepository {
    /// Returns `None` when nothing was persisted yet.
    ///
    /// # Errors
    /// - `InvalidData` when the blob is not a valid notebook.
    fn load(&self) -> RepoResult<Option<Notebook>>;
    /// Overwrites the persisted notebook.
    fn save(&mut self, notebook: &Notebook) -> RepoResult<()>;
}

/// Notebook repository over any [`LocalStorage`] backend.
pub struct LocalStorageNotebookRepository<S: LocalStorage> {
    storage: S,
}

impl<S: LocalStorage> LocalStorageNotebookRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Gives back the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: LocalStorage> NotebookRepository for LocalStorageNotebookRepository<S> {
    fn load(&self) -> RepoResult<Option<Notebook>> {
        let Some(raw) = self.storage.get_item(STORAGE_KEY)? else {
            return Ok(None);
        };
        let notebook = serde_json::from_str::<Notebook>(&raw)
            .map_err(|err| RepoError::InvalidData(format!("`{STORAGE_KEY}`: {err}")))?;
        debug!(
            "event=notebook_load module=repo status=ok themes={} notes={} bytes={}",
            notebook.len(),
            notebook.note_count(),
            raw.len()
        );
        Ok(Some(notebook))
    }

    fn save(&mut self, notebook: &Notebook) -> RepoResult<()> {
        let raw = serde_json::to_string(notebook)
            .map_err(|err| RepoError::InvalidData(format!("serialize notebook: {err}")))?;
        self.storage.set_item(STORAGE_KEY, &raw)?;
        debug!(
            "event=notebook_save module=repo status=ok themes={} bytes={}",
            notebook.len(),
            raw.len()
        );
        Ok(())
    }
}
