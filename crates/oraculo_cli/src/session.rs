//! Command dispatch against a [`NoteStore`].

use crate::command::{Command, HELP};
use crate::render::{render_hits, render_notes, render_sidebar};
use oraculo_core::{NoteStore, NotebookRepository, SelectionRange, StoreError};
use std::io::{self, Write};

/// Whether the read loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
enum SessionError {
    Io(io::Error),
    Store(StoreError),
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Runs one command.
///
/// Store errors are printed and do not end the session. `input` supplies
/// answers to confirmation prompts.
pub fn execute<R: NotebookRepository>(
    store: &mut NoteStore<R>,
    command: Command,
    input: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> io::Result<Flow> {
    let flow = match run(store, command, input, out) {
        Ok(flow) => flow,
        Err(SessionError::Io(err)) => return Err(err),
        Err(SessionError::Store(err)) => {
            log::debug!("event=command module=cli status=rejected error={err}");
            writeln!(out, "error: {err}")?;
            Flow::Continue
        }
    };
    for warning in store.take_warnings() {
        writeln!(out, "warning: {}", warning.message)?;
    }
    Ok(flow)
}

fn run<R: NotebookRepository>(
    store: &mut NoteStore<R>,
    command: Command,
    input: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
) -> Result<Flow, SessionError> {
    match command {
        Command::Empty => {}
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
        Command::Themes => render_sidebar(&store.view(), out)?,
        Command::List => render_notes(&store.view(), out)?,
        Command::AddTheme(name) => {
            let name = store.add_theme(&name)?;
            writeln!(out, "added theme {name}")?;
        }
        Command::UseTheme(name) => store.select_theme(&name)?,
        Command::RenameTheme { old, new } => {
            let new = store.rename_theme(&old, &new)?;
            writeln!(out, "renamed {old} to {new}")?;
        }
        Command::DropTheme(name) => {
            let count = store.list_notes(&name)?.len();
            write!(out, "delete theme {name} and its {count} note(s)? [y/N] ")?;
            out.flush()?;
            let answer = input.next().transpose()?.unwrap_or_default();
            if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                let removed = store.delete_theme(&name)?;
                writeln!(out, "deleted theme {name} ({} note(s))", removed.len())?;
            } else {
                writeln!(out, "kept theme {name}")?;
            }
        }
        Command::New => store.open_editor(None)?,
        Command::Edit(index) => store.open_editor(Some(index))?,
        Command::SetDraft(field, text) => {
            store.focus_field(field)?;
            store.set_draft(field, text)?;
        }
        Command::Focus(field) => store.focus_field(field)?,
        Command::Highlight { start, end } => {
            let content = store.apply_highlight(SelectionRange::new(start, end))?;
            writeln!(out, "content: {content}")?;
        }
        Command::Save => {
            let index = store.save_editor()?;
            writeln!(out, "saved note #{index}")?;
        }
        Command::Cancel => store.cancel_editor(),
        Command::Delete(index) => {
            let theme = active_theme(store)?;
            let note = store.delete_note(&theme, index)?;
            writeln!(out, "deleted note #{index} {}", note.title)?;
        }
        Command::Search(term) => {
            let theme = active_theme(store)?;
            let hits = store.search(&theme, &term)?;
            render_hits(&term, &hits, out)?;
        }
    }
    Ok(Flow::Continue)
}

fn active_theme<R: NotebookRepository>(store: &NoteStore<R>) -> Result<String, StoreError> {
    store
        .active_theme()
        .map(str::to_string)
        .ok_or(StoreError::NoActiveTheme)
}
