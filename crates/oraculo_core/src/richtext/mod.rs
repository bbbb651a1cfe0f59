//! Inline rich-text helpers for note fields.
//!
//! # Responsibility
//! - Wrap a visible-text selection in a color span.
//! - Escape plain text for adapters that emit HTML.

pub mod escape;
pub mod highlight;
