//! Note store: schema-validated CRUD, search and export over one document.
//!
//! # Responsibility
//! - Load the document once at construction and serve reads from memory.
//! - Validate tags against the schema before any mutation.
//! - Persist the whole document after every state-changing call.
//!
//! # Invariants
//! - Mutations are applied to a copy; the copy replaces the in-memory
//!   document only after it was persisted. A failed persist changes nothing.
//! - Reads never persist.
//! - No internal locking: callers sharing a store across threads must wrap
//!   it in a mutex covering the whole read-validate-mutate-persist sequence.

use crate::export::markdown::{self, DEFAULT_EXPORT_DIR_NAME};
use crate::model::note::{Note, NoteDocument, NoteId, NoteTags};
use crate::model::schema::{TagDimension, TagSchema, TagSelection, TagValidationError};
use crate::model::timestamp::next_timestamp;
use crate::repo::document_repo::{DocumentRepository, StorageError};
use crate::repo::json_file::JsonFileRepository;
use crate::service::note_query::{NoteQuery, TagUsage};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Store-level error for note use-cases.
#[derive(Debug)]
pub enum NoteStoreError {
    /// A tag value is not part of its schema dimension.
    Validation(TagValidationError),
    /// Schema mutation named an unknown dimension.
    InvalidDimension { dimension: String },
    /// No note carries the requested id.
    NotFound(NoteId),
    /// Loading or persisting the document failed.
    Storage(StorageError),
    /// Writing a markdown export failed.
    Export { path: PathBuf, source: io::Error },
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidDimension { dimension } => write!(
                f,
                "Invalid dimension '{dimension}'. Must be one of: {}",
                TagDimension::valid_names()
            ),
            Self::NotFound(id) => write!(f, "Note with ID '{id}' not found"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Export { path, source } => {
                write!(f, "failed to export to `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Export { source, .. } => Some(source),
            Self::InvalidDimension { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<TagValidationError> for NoteStoreError {
    fn from(value: TagValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for NoteStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Input for `create_note`. Category, type and priority are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub category: String,
    pub kind: String,
    pub priority: String,
    /// Defaults to no topics.
    pub topics: Option<Vec<String>>,
}

/// Partial update for `update_note`. `None` leaves a field untouched;
/// `topics: Some(vec![])` clears topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub topics: Option<Vec<String>>,
}

impl NoteUpdate {
    fn selection(&self) -> TagSelection<'_> {
        TagSelection {
            category: self.category.as_deref(),
            kind: self.kind.as_deref(),
            priority: self.priority.as_deref(),
            topics: self.topics.as_deref(),
        }
    }
}

/// In-process owner of the tag schema and all notes.
pub struct NoteStore<R: DocumentRepository> {
    repo: R,
    document: NoteDocument,
}

impl NoteStore<JsonFileRepository> {
    /// Opens the JSON document at `path`, seeding a fresh one when missing.
    pub fn open(path: impl Into<PathBuf>) -> NoteStoreResult<Self> {
        Self::new(JsonFileRepository::new(path))
    }
}

impl<R: DocumentRepository> NoteStore<R> {
    /// Loads the document through `repo`.
    ///
    /// A missing document yields the seed schema and no notes; nothing is
    /// written until the first mutation.
    pub fn new(repo: R) -> NoteStoreResult<Self> {
        let document = repo.load()?.unwrap_or_default();
        info!(
            "event=store_open module=service status=ok notes={}",
            document.notes.len()
        );
        Ok(Self { repo, document })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Read-only view of the whole in-memory document.
    pub fn document(&self) -> &NoteDocument {
        &self.document
    }

    /// Snapshot of the current tag schema.
    pub fn get_schema(&self) -> TagSchema {
        self.document.tag_schema.clone()
    }

    /// Appends `tags` to `dimension`, skipping values already present.
    pub fn add_tags_to_schema<S: AsRef<str>>(
        &mut self,
        dimension: &str,
        tags: &[S],
    ) -> NoteStoreResult<TagSchema> {
        let parsed: TagDimension = dimension
            .parse()
            .map_err(|_| NoteStoreError::InvalidDimension {
                dimension: dimension.to_string(),
            })?;

        let mut next = self.document.clone();
        let added = next.tag_schema.append_tags(parsed, tags);
        self.commit(next)?;
        info!(
            "event=schema_add_tags module=service status=ok dimension={} added={}",
            parsed, added
        );
        Ok(self.get_schema())
    }

    /// Checks provided tag fields against the schema without mutating anything.
    pub fn validate_tags(&self, selection: &TagSelection<'_>) -> Result<(), TagValidationError> {
        self.document.tag_schema.validate(selection)
    }

    /// Creates, persists and returns a new note.
    pub fn create_note(&mut self, input: NewNote) -> NoteStoreResult<Note> {
        let tags = NoteTags {
            category: input.category,
            kind: input.kind,
            priority: input.priority,
            topics: input.topics.unwrap_or_default(),
        };
        if let Err(err) = self.validate_tags(&tags.as_selection()) {
            warn!(
                "event=note_create module=service status=error error_code=invalid_tag dimension={}",
                err.dimension
            );
            return Err(err.into());
        }

        let note = Note::new(input.title, input.content, tags);
        let mut next = self.document.clone();
        next.notes.push(note.clone());
        self.commit(next)?;
        info!(
            "event=note_create module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Returns the note with `id`.
    pub fn read_note(&self, id: &str) -> NoteStoreResult<Note> {
        self.document
            .get(id)
            .cloned()
            .ok_or_else(|| NoteStoreError::NotFound(id.to_string()))
    }

    /// Applies a partial update, refreshing `updated`.
    ///
    /// Only provided tag fields are validated; on failure the note is left
    /// untouched.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> NoteStoreResult<Note> {
        let index = self
            .document
            .position(id)
            .ok_or_else(|| NoteStoreError::NotFound(id.to_string()))?;
        if let Err(err) = self.validate_tags(&update.selection()) {
            warn!(
                "event=note_update module=service status=error error_code=invalid_tag note_id={} dimension={}",
                id, err.dimension
            );
            return Err(err.into());
        }

        let mut next = self.document.clone();
        let note = &mut next.notes[index];
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(category) = update.category {
            note.tags.category = category;
        }
        if let Some(kind) = update.kind {
            note.tags.kind = kind;
        }
        if let Some(priority) = update.priority {
            note.tags.priority = priority;
        }
        if let Some(topics) = update.topics {
            note.tags.topics = topics;
        }
        note.updated = next_timestamp(&note.updated);
        let updated = note.clone();

        self.commit(next)?;
        info!(
            "event=note_update module=service status=ok note_id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Removes the note with `id`.
    pub fn delete_note(&mut self, id: &str) -> NoteStoreResult<()> {
        let index = self
            .document
            .position(id)
            .ok_or_else(|| NoteStoreError::NotFound(id.to_string()))?;

        let mut next = self.document.clone();
        next.notes.remove(index);
        self.commit(next)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Notes matching `query`, in document order.
    pub fn find_notes(&self, query: &NoteQuery) -> Vec<Note> {
        self.document
            .notes
            .iter()
            .filter(|note| query.matches(note))
            .cloned()
            .collect()
    }

    /// Usage histogram of tags carried by at least one note.
    pub fn list_tags(&self) -> TagUsage {
        TagUsage::from_notes(&self.document.notes)
    }

    /// Writes one note as markdown and returns the written path.
    ///
    /// Without `output_path` the file lands in the repository data directory.
    pub fn export_note_to_markdown(
        &self,
        id: &str,
        output_path: Option<&Path>,
    ) -> NoteStoreResult<PathBuf> {
        let note = self
            .document
            .get(id)
            .ok_or_else(|| NoteStoreError::NotFound(id.to_string()))?;
        let path = match output_path {
            Some(path) => path.to_path_buf(),
            None => self.repo.data_dir().join(markdown::export_file_name(note)),
        };
        markdown::write_note(note, &path).map_err(|source| NoteStoreError::Export {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Writes every note into `output_dir` (default `<data_dir>/exported_notes`).
    pub fn export_all_notes_to_markdown(
        &self,
        output_dir: Option<&Path>,
    ) -> NoteStoreResult<Vec<PathBuf>> {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.repo.data_dir().join(DEFAULT_EXPORT_DIR_NAME),
        };
        markdown::write_all(&self.document.notes, &dir)
            .map_err(|(path, source)| NoteStoreError::Export { path, source })
    }

    fn commit(&mut self, next: NoteDocument) -> NoteStoreResult<()> {
        self.repo.save(&next)?;
        self.document = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewNote, NoteStore, NoteStoreError, NoteUpdate};
    use crate::model::schema::TagSelection;
    use crate::repo::document_repo::MemoryDocumentRepository;

    fn store() -> NoteStore<MemoryDocumentRepository> {
        NoteStore::new(MemoryDocumentRepository::new()).unwrap()
    }

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: "body".to_string(),
            category: "work".to_string(),
            kind: "todo".to_string(),
            priority: "active".to_string(),
            topics: None,
        }
    }

    #[test]
    fn opening_without_document_does_not_persist() {
        let store = store();
        assert_eq!(store.repository().save_count(), 0);
        assert_eq!(store.get_schema().category, vec!["work", "personal", "learning"]);
    }

    #[test]
    fn create_defaults_topics_to_empty() {
        let mut store = store();
        let note = store.create_note(new_note("a")).unwrap();
        assert!(note.tags.topics.is_empty());
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn failed_validation_does_not_persist() {
        let mut store = store();
        let mut input = new_note("a");
        input.priority = "urgent".to_string();

        let err = store.create_note(input).unwrap_err();
        assert!(matches!(err, NoteStoreError::Validation(_)));
        assert!(store.document().notes.is_empty());
        assert_eq!(store.repository().save_count(), 0);
    }

    #[test]
    fn update_checks_existence_before_tags() {
        let mut store = store();
        let update = NoteUpdate {
            category: Some("bogus".to_string()),
            ..NoteUpdate::default()
        };
        let err = store.update_note("missing", update).unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(_)));
    }

    #[test]
    fn failed_persist_keeps_in_memory_state() {
        let mut store = store();
        let note = store.create_note(new_note("keep")).unwrap();
        store.repository_mut().set_fail_saves(true);

        let update = NoteUpdate {
            title: Some("lost".to_string()),
            ..NoteUpdate::default()
        };
        let err = store.update_note(&note.id, update).unwrap_err();
        assert!(matches!(err, NoteStoreError::Storage(_)));
        assert_eq!(store.read_note(&note.id).unwrap(), note);

        assert!(store.delete_note(&note.id).is_err());
        assert!(store.add_tags_to_schema("topics", &["rust"]).is_err());
        assert_eq!(store.document().notes.len(), 1);
        assert!(!store.get_schema().topics.contains(&"rust".to_string()));
    }

    #[test]
    fn validate_tags_is_pure() {
        let store = store();
        let selection = TagSelection {
            category: Some("nope"),
            ..TagSelection::default()
        };
        assert!(store.validate_tags(&selection).is_err());
        assert_eq!(store.repository().save_count(), 0);
    }
}
