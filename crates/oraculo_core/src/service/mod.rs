//! Note store controller.
//!
//! # Responsibility
//! - Orchestrate notebook mutations, persistence and change notifications.
//! - Keep adapters (CLI, FFI) decoupled from storage details.

pub mod events;
pub mod note_store;
