//! Flutter-facing bindings for Oraculo notes.

pub mod api;
