//! Markdown export of notes.
//!
//! Export is a convenience output, not a system-of-record write: files are
//! written directly without atomic replace.

pub mod markdown;
