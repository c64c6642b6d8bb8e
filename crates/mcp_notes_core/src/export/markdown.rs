//! Markdown rendering and file export for notes.
//!
//! # Responsibility
//! - Render a note into the fixed markdown template.
//! - Derive filesystem-safe export file names.
//! - Write rendered notes to disk (plain, non-atomic writes).
//!
//! # Invariants
//! - File names follow `<sanitized_title>_<first 8 chars of id>.md`.
//! - The topics line is present only when the note has topics.

use crate::model::note::Note;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory name used by batch export when no directory is given.
pub const DEFAULT_EXPORT_DIR_NAME: &str = "exported_notes";

static UNSAFE_FILENAME_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N} _\-]").expect("valid filename regex"));

/// Renders one note as markdown.
pub fn render_markdown(note: &Note) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "# {}\n\n**ID**: {}\n**Created**: {}\n**Updated**: {}\n\n**Tags**:\n- Category: {}\n- Type: {}\n- Priority: {}\n",
        note.title,
        note.id,
        note.created,
        note.updated,
        note.tags.category,
        note.tags.kind,
        note.tags.priority,
    );
    if !note.tags.topics.is_empty() {
        let _ = writeln!(out, "- Topics: {}", note.tags.topics.join(", "));
    }
    let _ = write!(out, "\n---\n\n{}\n", note.content);
    out
}

/// Replaces characters outside alnum/space/`-`/`_` with `_`, trims, and turns
/// spaces into underscores.
pub fn sanitize_title(title: &str) -> String {
    UNSAFE_FILENAME_CHAR_RE
        .replace_all(title, "_")
        .trim_matches(' ')
        .replace(' ', "_")
}

/// Default export file name for `note`.
pub fn export_file_name(note: &Note) -> String {
    format!("{}_{}.md", sanitize_title(&note.title), note.short_id())
}

/// Renders `note` and writes it to `path`, overwriting any existing file.
pub fn write_note(note: &Note, path: &Path) -> io::Result<()> {
    fs::write(path, render_markdown(note))?;
    info!(
        "event=export_note module=export status=ok note_id={} path={}",
        note.id,
        path.display()
    );
    Ok(())
}

/// Writes every note into `dir` (created with parents when missing).
///
/// Returns written paths in note order.
pub fn write_all<'a>(
    notes: impl IntoIterator<Item = &'a Note>,
    dir: &Path,
) -> Result<Vec<PathBuf>, (PathBuf, io::Error)> {
    fs::create_dir_all(dir).map_err(|err| (dir.to_path_buf(), err))?;

    let mut written = Vec::new();
    for note in notes {
        let path = dir.join(export_file_name(note));
        write_note(note, &path).map_err(|err| (path.clone(), err))?;
        written.push(path);
    }
    info!(
        "event=export_all module=export status=ok notes={} dir={}",
        written.len(),
        dir.display()
    );
    Ok(written)
}
