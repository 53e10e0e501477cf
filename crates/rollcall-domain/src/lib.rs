//! Domain types shared across the Rollcall workspace.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod role;
