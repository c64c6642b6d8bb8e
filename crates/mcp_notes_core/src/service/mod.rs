//! Note store use-cases.
//!
//! # Responsibility
//! - Own the in-memory document and orchestrate validate/mutate/persist.
//! - Keep tool adapters decoupled from persistence details.

pub mod note_query;
pub mod note_store;
