//! Repository contract for the persisted note document.
//!
//! # Responsibility
//! - Describe how the store loads and saves the whole document.
//! - Provide an in-memory implementation for embedding and tests.
//!
//! # Invariants
//! - Repositories never partially apply a save.

use crate::model::note::NoteDocument;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum StorageError {
    /// Persisted document exists but cannot be parsed into the model.
    Corrupt { path: PathBuf, message: String },
    /// Persisted document exists but cannot be read.
    Read { path: PathBuf, source: io::Error },
    /// Temp-file write, sync or atomic rename failed.
    Write { path: PathBuf, source: io::Error },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt { path, message } => write!(
                f,
                "notes document `{}` is corrupt: {message}",
                path.display()
            ),
            Self::Read { path, source } => write!(
                f,
                "failed to read notes document `{}`: {source}",
                path.display()
            ),
            Self::Write { path, source } => write!(
                f,
                "failed to write notes document `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corrupt { .. } => None,
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Load/save contract for the whole note document.
pub trait DocumentRepository {
    /// Loads the persisted document, or `None` when nothing was persisted yet.
    fn load(&self) -> StorageResult<Option<NoteDocument>>;
    /// Replaces the persisted document with `document`.
    fn save(&mut self, document: &NoteDocument) -> StorageResult<()>;
    /// Directory used for default export locations.
    fn data_dir(&self) -> PathBuf;
}

const MEMORY_LOCATION: &str = ":memory:";

/// Repository keeping the last saved document in memory.
///
/// Counts saves and can simulate write failures.
#[derive(Debug, Clone)]
pub struct MemoryDocumentRepository {
    stored: Option<NoteDocument>,
    save_count: usize,
    fail_saves: bool,
    data_dir: PathBuf,
}

impl Default for MemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentRepository {
    /// Empty repository; loading yields `None`.
    pub fn new() -> Self {
        Self {
            stored: None,
            save_count: 0,
            fail_saves: false,
            data_dir: PathBuf::from("."),
        }
    }

    /// Repository pre-populated as if `document` had been persisted.
    pub fn with_document(document: NoteDocument) -> Self {
        Self {
            stored: Some(document),
            ..Self::new()
        }
    }

    /// Overrides the directory reported for default exports.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Makes every subsequent `save` fail (or succeed again).
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Last successfully saved (or seeded) document.
    pub fn stored(&self) -> Option<&NoteDocument> {
        self.stored.as_ref()
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn load(&self) -> StorageResult<Option<NoteDocument>> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, document: &NoteDocument) -> StorageResult<()> {
        if self.fail_saves {
            return Err(StorageError::Write {
                path: PathBuf::from(MEMORY_LOCATION),
                source: io::Error::other("simulated write failure"),
            });
        }
        self.stored = Some(document.clone());
        self.save_count += 1;
        Ok(())
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRepository, MemoryDocumentRepository, StorageError};
    use crate::model::note::NoteDocument;

    #[test]
    fn memory_repo_starts_empty_and_counts_saves() {
        let mut repo = MemoryDocumentRepository::new();
        assert!(repo.load().unwrap().is_none());

        repo.save(&NoteDocument::default()).unwrap();
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().unwrap(), Some(NoteDocument::default()));
    }

    #[test]
    fn memory_repo_simulated_failure_keeps_previous_document() {
        let mut repo = MemoryDocumentRepository::with_document(NoteDocument::default());
        repo.set_fail_saves(true);

        let mut changed = NoteDocument::default();
        changed.tag_schema.topics.push("rust".to_string());
        let err = repo.save(&changed).unwrap_err();

        assert!(matches!(err, StorageError::Write { .. }));
        assert_eq!(repo.save_count(), 0);
        assert_eq!(repo.stored(), Some(&NoteDocument::default()));
    }
}
