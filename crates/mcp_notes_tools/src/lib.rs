//! Tool adapter for the notes backend.
//!
//! # Responsibility
//! - Describe the operation surface as named tools with JSON input schemas.
//! - Dispatch tool calls to `mcp_notes_core` and render results as text.
//!
//! # Invariants
//! - Store errors are caught here exactly once and rendered as failure text.

pub mod catalog;
pub mod dispatch;

pub use catalog::{tool_definitions, ToolDefinition};
pub use dispatch::{call_tool, ToolOutput};
