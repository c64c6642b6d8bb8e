//! Core domain logic for the MCP notes backend.
//! This crate is the single source of truth for tag-schema and note invariants.

pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::markdown::{export_file_name, render_markdown, sanitize_title};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteDocument, NoteId, NoteTags};
pub use model::schema::{
    TagDimension, TagSchema, TagSelection, TagValidationError, UnknownDimension,
};
pub use repo::document_repo::{
    DocumentRepository, MemoryDocumentRepository, StorageError, StorageResult,
};
pub use repo::json_file::JsonFileRepository;
pub use service::note_query::{NoteQuery, TagUsage};
pub use service::note_store::{NewNote, NoteStore, NoteStoreError, NoteStoreResult, NoteUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
