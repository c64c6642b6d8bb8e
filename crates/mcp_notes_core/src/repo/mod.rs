//! Document persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the note store persists through.
//! - Isolate file-system and serialization details from store orchestration.
//!
//! # Invariants
//! - `save` either fully replaces the persisted document or leaves it untouched.
//! - `load` rejects malformed persisted state instead of repairing it.

pub mod document_repo;
pub mod json_file;
