//! Note search over a theme's list.
//!
//! # Responsibility
//! - Match terms against plain text, never against markup.
//! - Return hits that still address the unfiltered note list.

pub mod filter;
