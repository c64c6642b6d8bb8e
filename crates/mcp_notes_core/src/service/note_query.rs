//! Note search filters and tag usage counting.
//!
//! # Invariants
//! - Provided filters combine with AND; requested topics combine with OR.
//! - Date bounds are inclusive lexical comparisons on ISO-8601 strings.
//! - Usage counts only include tags carried by at least one note.

use crate::model::note::Note;
use serde::Serialize;
use std::collections::BTreeMap;

/// Filter set for `find_notes`. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub category: Option<String>,
    pub kind: Option<String>,
    pub priority: Option<String>,
    /// Matches notes carrying at least one of these topics.
    pub topics: Option<Vec<String>>,
    /// Case-insensitive title substring.
    pub title_contains: Option<String>,
    /// Keeps `created >= bound`.
    pub created_after: Option<String>,
    /// Keeps `created <= bound`.
    pub created_before: Option<String>,
    /// Keeps `updated >= bound`.
    pub updated_after: Option<String>,
    /// Keeps `updated <= bound`.
    pub updated_before: Option<String>,
}

impl NoteQuery {
    /// Returns whether `note` satisfies every provided filter.
    pub fn matches(&self, note: &Note) -> bool {
        let tags = &note.tags;
        if !matches_exact(self.category.as_deref(), &tags.category)
            || !matches_exact(self.kind.as_deref(), &tags.kind)
            || !matches_exact(self.priority.as_deref(), &tags.priority)
        {
            return false;
        }

        if let Some(wanted) = self.topics.as_ref() {
            if !wanted.iter().any(|topic| tags.topics.contains(topic)) {
                return false;
            }
        }

        if let Some(needle) = self.title_contains.as_deref() {
            if !note
                .title
                .to_lowercase()
                .contains(needle.to_lowercase().as_str())
            {
                return false;
            }
        }

        within_bounds(
            &note.created,
            self.created_after.as_deref(),
            self.created_before.as_deref(),
        ) && within_bounds(
            &note.updated,
            self.updated_after.as_deref(),
            self.updated_before.as_deref(),
        )
    }
}

fn matches_exact(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |wanted| wanted == value)
}

fn within_bounds(value: &str, after: Option<&str>, before: Option<&str>) -> bool {
    after.map_or(true, |bound| value >= bound) && before.map_or(true, |bound| value <= bound)
}

/// Per-dimension histogram of tags in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagUsage {
    pub category: BTreeMap<String, usize>,
    #[serde(rename = "type")]
    pub kind: BTreeMap<String, usize>,
    pub priority: BTreeMap<String, usize>,
    pub topics: BTreeMap<String, usize>,
}

impl TagUsage {
    /// Counts tag usage across `notes`; each topic occurrence counts once.
    pub fn from_notes<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Self {
        let mut usage = Self::default();
        for note in notes {
            bump(&mut usage.category, &note.tags.category);
            bump(&mut usage.kind, &note.tags.kind);
            bump(&mut usage.priority, &note.tags.priority);
            for topic in &note.tags.topics {
                bump(&mut usage.topics, topic);
            }
        }
        usage
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, tag: &str) {
    *counts.entry(tag.to_string()).or_insert(0) += 1;
}
