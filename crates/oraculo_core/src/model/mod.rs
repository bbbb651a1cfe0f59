//! Domain model for themed notes.
//!
//! # Responsibility
//! - Define the note, theme and notebook shapes shared by storage and service.
//! - Keep the editor session state next to the data it edits.
//!
//! # Invariants
//! - Every theme key maps to a (possibly empty) ordered note list.
//! - Theme names are trimmed, non-empty and unique.

pub mod editor;
pub mod note;
pub mod notebook;
pub mod theme;
