//! Tool call dispatch over a note store.
//!
//! # Responsibility
//! - Decode JSON tool arguments into store requests.
//! - Render every outcome as text, turning all errors into failure output.
//!
//! # Invariants
//! - `call_tool` never returns an error and never panics on bad input; one
//!   failed call leaves the caller free to serve the next one.
//! - This is the only layer that converts store errors to text.

use log::{info, warn};
use mcp_notes_core::{
    DocumentRepository, NewNote, NoteQuery, NoteStore, NoteStoreError, NoteUpdate,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Text result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    /// Whether the call failed.
    pub is_error: bool,
    /// Human-readable payload or failure message.
    pub text: String,
}

impl ToolOutput {
    fn success(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            text: text.into(),
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
enum ToolError {
    UnknownTool(String),
    InvalidArguments {
        tool: &'static str,
        source: serde_json::Error,
    },
    Store(NoteStoreError),
    Render(serde_json::Error),
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "Unknown tool: {name}"),
            Self::InvalidArguments { tool, source } => {
                write!(f, "invalid arguments for `{tool}`: {source}")
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render result: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownTool(_) => None,
            Self::InvalidArguments { source, .. } => Some(source),
            Self::Store(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<NoteStoreError> for ToolError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

impl ToolError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::Store(NoteStoreError::Validation(_)) => "validation",
            Self::Store(NoteStoreError::InvalidDimension { .. }) => "invalid_dimension",
            Self::Store(NoteStoreError::NotFound(_)) => "not_found",
            Self::Store(NoteStoreError::Storage(_)) => "storage",
            Self::Store(NoteStoreError::Export { .. }) => "export",
            Self::Render(_) => "render",
        }
    }
}

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Deserialize)]
struct CreateNoteArgs {
    title: String,
    content: String,
    category: String,
    #[serde(rename = "type")]
    kind: String,
    priority: String,
    topics: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct UpdateNoteArgs {
    id: String,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    priority: Option<String>,
    topics: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct FindNotesArgs {
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    priority: Option<String>,
    topics: Option<Vec<String>>,
    title_contains: Option<String>,
    created_after: Option<String>,
    created_before: Option<String>,
    updated_after: Option<String>,
    updated_before: Option<String>,
}

#[derive(Deserialize)]
struct AddTagsArgs {
    dimension: String,
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct ExportNoteArgs {
    id: String,
    output_path: Option<String>,
}

#[derive(Deserialize)]
struct ExportAllArgs {
    output_dir: Option<String>,
}

/// Runs tool `name` with JSON `arguments` against `store`.
///
/// `arguments` may be `null` for tools without required fields.
pub fn call_tool<R: DocumentRepository>(
    store: &mut NoteStore<R>,
    name: &str,
    arguments: &Value,
) -> ToolOutput {
    let started_at = Instant::now();
    match dispatch(store, name, arguments) {
        Ok(text) => {
            info!(
                "event=tool_call module=tools status=ok tool={} duration_ms={}",
                name,
                started_at.elapsed().as_millis()
            );
            ToolOutput::success(text)
        }
        Err(err) => {
            warn!(
                "event=tool_call module=tools status=error tool={} error_code={} duration_ms={}",
                name,
                err.error_code(),
                started_at.elapsed().as_millis()
            );
            match err {
                ToolError::UnknownTool(_) => ToolOutput::failure(err.to_string()),
                other => ToolOutput::failure(format!("Error: {other}")),
            }
        }
    }
}

fn dispatch<R: DocumentRepository>(
    store: &mut NoteStore<R>,
    name: &str,
    arguments: &Value,
) -> Result<String, ToolError> {
    match name {
        "get_tag_schema" => pretty(&store.get_schema()),
        "create_note" => {
            let args: CreateNoteArgs = decode("create_note", arguments)?;
            let note = store.create_note(NewNote {
                title: args.title,
                content: args.content,
                category: args.category,
                kind: args.kind,
                priority: args.priority,
                topics: args.topics,
            })?;
            Ok(format!("Note created successfully!\n\n{}", pretty(&note)?))
        }
        "update_note" => {
            let args: UpdateNoteArgs = decode("update_note", arguments)?;
            let note = store.update_note(
                &args.id,
                NoteUpdate {
                    title: args.title,
                    content: args.content,
                    category: args.category,
                    kind: args.kind,
                    priority: args.priority,
                    topics: args.topics,
                },
            )?;
            Ok(format!("Note updated successfully!\n\n{}", pretty(&note)?))
        }
        "delete_note" => {
            let args: IdArgs = decode("delete_note", arguments)?;
            store.delete_note(&args.id)?;
            Ok(format!("Note '{}' deleted successfully", args.id))
        }
        "read_note" => {
            let args: IdArgs = decode("read_note", arguments)?;
            pretty(&store.read_note(&args.id)?)
        }
        "find_notes_by_tags" => {
            let args: FindNotesArgs = decode("find_notes_by_tags", arguments)?;
            let notes = store.find_notes(&NoteQuery {
                category: args.category,
                kind: args.kind,
                priority: args.priority,
                topics: args.topics,
                title_contains: args.title_contains,
                created_after: args.created_after,
                created_before: args.created_before,
                updated_after: args.updated_after,
                updated_before: args.updated_before,
            });
            if notes.is_empty() {
                Ok("No notes found matching the criteria".to_string())
            } else {
                Ok(format!(
                    "Found {} note(s):\n\n{}",
                    notes.len(),
                    pretty(&notes)?
                ))
            }
        }
        "list_tags" => pretty(&store.list_tags()),
        "add_tags_to_schema" => {
            let args: AddTagsArgs = decode("add_tags_to_schema", arguments)?;
            let schema = store.add_tags_to_schema(&args.dimension, &args.tags)?;
            Ok(format!(
                "Tags added successfully to '{}' dimension!\n\n{}",
                args.dimension,
                pretty(&schema)?
            ))
        }
        "export_note_to_markdown" => {
            let args: ExportNoteArgs = decode("export_note_to_markdown", arguments)?;
            let path = store.export_note_to_markdown(
                &args.id,
                args.output_path.as_deref().map(Path::new),
            )?;
            Ok(format!("Note exported successfully to: {}", path.display()))
        }
        "export_all_notes_to_markdown" => {
            let args: ExportAllArgs = decode("export_all_notes_to_markdown", arguments)?;
            let paths =
                store.export_all_notes_to_markdown(args.output_dir.as_deref().map(Path::new))?;
            Ok(format!(
                "Exported {} note(s) to markdown files:\n\n{}",
                paths.len(),
                join_paths(&paths)
            ))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(tool: &'static str, arguments: &Value) -> Result<T, ToolError> {
    let value = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|source| ToolError::InvalidArguments { tool, source })
}

fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(ToolError::Render)
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
