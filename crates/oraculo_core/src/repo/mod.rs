//! Persistence layer: key/value local storage and the notebook blob.
//!
//! # Responsibility
//! - Mirror the browser `localStorage` contract behind the `LocalStorage` trait.
//! - Keep the JSON blob format inside `NotebookRepository`.
//!
//! # Invariants
//! - The whole notebook lives under one fixed storage key.
//! - Writes replace the full blob; there are no partial writes.

pub mod local_storage;
pub mod notebook_repo;
