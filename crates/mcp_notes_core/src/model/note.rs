//! Note and document models.
//!
//! # Responsibility
//! - Define the persisted shape of notes and the owning document.
//! - Provide constructors that stamp identity and lifecycle timestamps.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused or mutated.
//! - `created` is set once; `updated` starts equal to `created`.
//! - Note order inside a document is insertion order.

use crate::model::schema::{TagSchema, TagSelection};
use crate::model::timestamp::now_timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque note identifier (UUIDv4 text for notes created by this crate).
pub type NoteId = String;

/// Structured tags carried by every note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTags {
    pub category: String,
    /// Serialized as `type` to match the persisted document.
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl NoteTags {
    /// Borrows every field as a fully-provided selection.
    pub fn as_selection(&self) -> TagSelection<'_> {
        TagSelection {
            category: Some(&self.category),
            kind: Some(&self.kind),
            priority: Some(&self.priority),
            topics: Some(&self.topics),
        }
    }
}

/// One titled, tagged, timestamped piece of markdown content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub tags: NoteTags,
    /// ISO-8601 UTC instant, `Z` suffixed.
    pub created: String,
    /// ISO-8601 UTC instant, refreshed on every mutation.
    pub updated: String,
}

impl Note {
    /// Creates a note with a fresh id and `created == updated == now`.
    ///
    /// Does not validate tags; callers check them against the schema first.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: NoteTags) -> Self {
        let now = now_timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            tags,
            created: now.clone(),
            updated: now,
        }
    }

    /// First eight characters of the id, used in export file names.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}

/// The whole persisted state: one schema plus all notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NoteDocument {
    pub tag_schema: TagSchema,
    pub notes: Vec<Note>,
}

impl NoteDocument {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }
}
