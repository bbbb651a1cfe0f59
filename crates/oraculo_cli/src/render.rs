//! Terminal rendering of the store.
//!
//! Every store event triggers a full redraw of the affected panel.

use oraculo_core::{
    strip_markup, EditorMode, EditorSession, SearchHit, StoreEvent, StoreListener, StoreView,
};
use std::io::{self, Write};

/// Sidebar: theme names, active one marked.
pub fn render_sidebar(view: &StoreView<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== themes ==")?;
    let mut any = false;
    for name in view.theme_names() {
        any = true;
        let marker = if view.active_theme() == Some(name) { '*' } else { ' ' };
        writeln!(out, " {marker} {name}")?;
    }
    if !any {
        writeln!(out, "   (none yet, use `add <name>`)")?;
    }
    Ok(())
}

/// Notes panel for the active theme.
pub fn render_notes(view: &StoreView<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== {} ==", view.display_title())?;
    let notes = view.active_notes();
    if view.active_theme().is_some() && notes.is_empty() {
        writeln!(out, "   (no notes)")?;
    }
    for (index, note) in notes.iter().enumerate() {
        writeln!(out, " #{index} {}", note.title)?;
        writeln!(out, "     {}", strip_markup(&note.content))?;
    }
    Ok(())
}

/// Search results, labelled with their full-list index.
pub fn render_hits(term: &str, hits: &[SearchHit], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== search `{term}`: {} match(es) ==", hits.len())?;
    for hit in hits {
        writeln!(out, " #{} {}", hit.index, hit.note.title)?;
        writeln!(out, "     {}", strip_markup(&hit.note.content))?;
    }
    Ok(())
}

/// Editor modal; prints nothing when closed.
pub fn render_editor(editor: &EditorSession, out: &mut impl Write) -> io::Result<()> {
    let heading = match editor.mode() {
        EditorMode::Closed => return Ok(()),
        EditorMode::Creating => "new note".to_string(),
        EditorMode::Editing(index) => format!("editing #{index}"),
    };
    writeln!(out, "-- {heading} --")?;
    writeln!(out, "  title:   {}", editor.draft_title())?;
    writeln!(out, "  content: {}", editor.draft_content())?;
    writeln!(out, "  (save | cancel)")?;
    Ok(())
}

/// Store listener drawing to stdout.
pub struct TerminalRenderer;

impl TerminalRenderer {
    fn redraw(event: &StoreEvent, view: &StoreView<'_>, out: &mut impl Write) -> io::Result<()> {
        match event {
            StoreEvent::Loaded | StoreEvent::ThemesChanged => {
                render_sidebar(view, out)?;
                render_notes(view, out)
            }
            StoreEvent::ActiveThemeChanged | StoreEvent::NotesChanged { .. } => {
                render_notes(view, out)
            }
            StoreEvent::EditorChanged => render_editor(view.editor(), out),
        }
    }
}

impl StoreListener for TerminalRenderer {
    fn on_store_event(&mut self, event: &StoreEvent, view: &StoreView<'_>) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = Self::redraw(event, view, &mut out) {
            log::warn!("event=render module=cli status=error error={err}");
        }
    }
}
