//! Tag schema model and tag validation.
//!
//! # Responsibility
//! - Define the four fixed classification dimensions and their allowed values.
//! - Validate tag selections against the current schema.
//!
//! # Invariants
//! - The set of dimensions is closed: `category`, `type`, `priority`, `topics`.
//! - Dimension values are only ever appended; never removed or renamed.
//! - Appending a value that is already present is a no-op.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the four fixed classification axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagDimension {
    Category,
    Type,
    Priority,
    Topics,
}

impl TagDimension {
    /// All dimensions in canonical order.
    pub const ALL: [TagDimension; 4] = [
        TagDimension::Category,
        TagDimension::Type,
        TagDimension::Priority,
        TagDimension::Topics,
    ];

    /// Wire name used in the persisted document and tool arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Type => "type",
            Self::Priority => "priority",
            Self::Topics => "topics",
        }
    }

    /// Comma separated list of every valid dimension name.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|dimension| dimension.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for TagDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dimension name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension(pub String);

impl Display for UnknownDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid dimension '{}'. Must be one of: {}",
            self.0,
            TagDimension::valid_names()
        )
    }
}

impl Error for UnknownDimension {}

impl FromStr for TagDimension {
    type Err = UnknownDimension;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == value)
            .ok_or_else(|| UnknownDimension(value.to_string()))
    }
}

/// Allowed tag values per dimension, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSchema {
    pub category: Vec<String>,
    /// Serialized as `type` to match the persisted document.
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub priority: Vec<String>,
    pub topics: Vec<String>,
}

impl Default for TagSchema {
    /// Seed schema used when no document has been persisted yet.
    fn default() -> Self {
        Self {
            category: to_owned_list(&["work", "personal", "learning"]),
            kind: to_owned_list(&["project", "idea", "reference", "todo", "note"]),
            priority: to_owned_list(&[
                "active",
                "soon",
                "someday",
                "eventually",
                "maybe",
                "not-actionable",
            ]),
            topics: to_owned_list(&["mcp", "ai", "coding", "design"]),
        }
    }
}

impl TagSchema {
    /// Allowed values for one dimension.
    pub fn values(&self, dimension: TagDimension) -> &[String] {
        match dimension {
            TagDimension::Category => &self.category,
            TagDimension::Type => &self.kind,
            TagDimension::Priority => &self.priority,
            TagDimension::Topics => &self.topics,
        }
    }

    fn values_mut(&mut self, dimension: TagDimension) -> &mut Vec<String> {
        match dimension {
            TagDimension::Category => &mut self.category,
            TagDimension::Type => &mut self.kind,
            TagDimension::Priority => &mut self.priority,
            TagDimension::Topics => &mut self.topics,
        }
    }

    /// Returns whether `value` is allowed in `dimension`.
    pub fn contains(&self, dimension: TagDimension, value: &str) -> bool {
        self.values(dimension).iter().any(|allowed| allowed == value)
    }

    /// Appends each tag not already present, preserving input order.
    ///
    /// Returns the number of values actually added.
    pub fn append_tags<S: AsRef<str>>(&mut self, dimension: TagDimension, tags: &[S]) -> usize {
        let values = self.values_mut(dimension);
        let mut added = 0;
        for tag in tags {
            let tag = tag.as_ref();
            if !values.iter().any(|existing| existing == tag) {
                values.push(tag.to_string());
                added += 1;
            }
        }
        added
    }

    /// Checks a tag selection against this schema.
    ///
    /// Absent fields are not checked. Checks run in the order category, type,
    /// priority, topics and stop at the first violation.
    pub fn validate(&self, selection: &TagSelection<'_>) -> Result<(), TagValidationError> {
        let singles = [
            (TagDimension::Category, selection.category),
            (TagDimension::Type, selection.kind),
            (TagDimension::Priority, selection.priority),
        ];
        for (dimension, value) in singles {
            if let Some(value) = value {
                if !self.contains(dimension, value) {
                    return Err(TagValidationError::new(dimension, value, self));
                }
            }
        }

        if let Some(topics) = selection.topics {
            if let Some(topic) = topics
                .iter()
                .find(|topic| !self.contains(TagDimension::Topics, topic))
            {
                return Err(TagValidationError::new(TagDimension::Topics, topic, self));
            }
        }

        Ok(())
    }
}

/// Borrowed view of the tag fields a caller provided.
///
/// `None` means "not provided" and is never validated; `Some(&[])` for topics
/// is a provided, empty topic list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSelection<'a> {
    pub category: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub topics: Option<&'a [String]>,
}

/// A tag value that is not part of its schema dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValidationError {
    pub dimension: TagDimension,
    pub value: String,
    /// Full set of values the dimension allowed at validation time.
    pub allowed: Vec<String>,
}

impl TagValidationError {
    fn new(dimension: TagDimension, value: &str, schema: &TagSchema) -> Self {
        Self {
            dimension,
            value: value.to_string(),
            allowed: schema.values(dimension).to_vec(),
        }
    }

    fn field_label(&self) -> &'static str {
        match self.dimension {
            TagDimension::Topics => "topic",
            other => other.as_str(),
        }
    }
}

impl Display for TagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Must be one of: {}",
            self.field_label(),
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl Error for TagValidationError {}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
