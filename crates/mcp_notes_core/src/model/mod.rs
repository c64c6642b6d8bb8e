//! Persisted domain model for notes and the tag schema.
//!
//! # Responsibility
//! - Define the strongly-typed shapes behind the JSON document.
//! - Own schema membership rules used by write-time validation.
//!
//! # Invariants
//! - Every note's tags are members of the schema at the time they were written.
//! - The wire format keys (`tag_schema`, `notes`, `type`, ...) are stable.

pub mod note;
pub mod schema;
pub mod timestamp;
