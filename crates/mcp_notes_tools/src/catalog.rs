//! Tool catalogue: names, descriptions and JSON input schemas.
//!
//! # Invariants
//! - Every name listed here is handled by `call_tool`.
//! - Required argument lists match the fields `call_tool` refuses to default.

use serde::Serialize;
use serde_json::{json, Value};

/// Describes one remotely invokable tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

fn string_prop(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn string_array_prop(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

fn no_args() -> Value {
    json!({ "type": "object", "properties": {}, "required": [] })
}

/// Every tool exposed by the notes backend, in presentation order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_tag_schema",
            "Get the complete tag schema showing all valid tags for categories, types, priorities, and topics",
            no_args(),
        ),
        ToolDefinition::new(
            "create_note",
            "Create a new note with title, content, and structured tags",
            json!({
                "type": "object",
                "properties": {
                    "title": string_prop("Note title"),
                    "content": string_prop("Markdown-formatted content"),
                    "category": string_prop("Category tag (must be from schema)"),
                    "type": string_prop("Type tag (must be from schema)"),
                    "priority": string_prop("Priority tag (must be from schema)"),
                    "topics": string_array_prop("Optional array of topic tags (each must be from schema)"),
                },
                "required": ["title", "content", "category", "type", "priority"],
            }),
        ),
        ToolDefinition::new(
            "update_note",
            "Update an existing note (partial updates supported)",
            json!({
                "type": "object",
                "properties": {
                    "id": string_prop("Note UUID"),
                    "title": string_prop("New title"),
                    "content": string_prop("New content"),
                    "category": string_prop("New category"),
                    "type": string_prop("New type"),
                    "priority": string_prop("New priority"),
                    "topics": string_array_prop("New topics (replaces existing)"),
                },
                "required": ["id"],
            }),
        ),
        ToolDefinition::new(
            "delete_note",
            "Delete a note by ID",
            json!({
                "type": "object",
                "properties": { "id": string_prop("Note UUID to delete") },
                "required": ["id"],
            }),
        ),
        ToolDefinition::new(
            "read_note",
            "Read the full content of a specific note by ID",
            json!({
                "type": "object",
                "properties": { "id": string_prop("Note UUID to read") },
                "required": ["id"],
            }),
        ),
        ToolDefinition::new(
            "find_notes_by_tags",
            "Search notes using tag filtering, title search, and date filters (AND logic across all filters, OR within topics)",
            json!({
                "type": "object",
                "properties": {
                    "category": string_prop("Filter by category"),
                    "type": string_prop("Filter by type"),
                    "priority": string_prop("Filter by priority"),
                    "topics": string_array_prop("Filter by topics (match ANY)"),
                    "title_contains": string_prop("Filter by title substring (case-insensitive)"),
                    "created_after": string_prop("Keep notes created at or after this ISO-8601 timestamp"),
                    "created_before": string_prop("Keep notes created at or before this ISO-8601 timestamp"),
                    "updated_after": string_prop("Keep notes updated at or after this ISO-8601 timestamp"),
                    "updated_before": string_prop("Keep notes updated at or before this ISO-8601 timestamp"),
                },
                "required": [],
            }),
        ),
        ToolDefinition::new(
            "list_tags",
            "List all tags currently in use across all notes with counts",
            no_args(),
        ),
        ToolDefinition::new(
            "add_tags_to_schema",
            "Add new tags to a schema dimension (category, type, priority, or topics)",
            json!({
                "type": "object",
                "properties": {
                    "dimension": string_prop("The schema dimension to add tags to (category, type, priority, or topics)"),
                    "tags": string_array_prop("Array of tag values to add to the dimension"),
                },
                "required": ["dimension", "tags"],
            }),
        ),
        ToolDefinition::new(
            "export_note_to_markdown",
            "Export a single note to a markdown file",
            json!({
                "type": "object",
                "properties": {
                    "id": string_prop("Note UUID to export"),
                    "output_path": string_prop("Optional custom output file path (auto-generated if not provided)"),
                },
                "required": ["id"],
            }),
        ),
        ToolDefinition::new(
            "export_all_notes_to_markdown",
            "Export all notes to markdown files in a directory",
            json!({
                "type": "object",
                "properties": {
                    "output_dir": string_prop("Optional output directory path (defaults to 'exported_notes' next to the notes file)"),
                },
                "required": [],
            }),
        ),
    ]
}
