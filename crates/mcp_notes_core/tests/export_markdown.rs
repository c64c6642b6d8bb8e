use mcp_notes_core::{
    export_file_name, JsonFileRepository, MemoryDocumentRepository, NewNote, NoteStore,
    NoteStoreError,
};
use std::fs;
use tempfile::TempDir;

fn new_note(title: &str, topics: Option<Vec<String>>) -> NewNote {
    NewNote {
        title: title.to_string(),
        content: "Line one\n\n- item".to_string(),
        category: "learning".to_string(),
        kind: "reference".to_string(),
        priority: "someday".to_string(),
        topics,
    }
}

#[test]
fn export_note_defaults_to_data_dir_with_sanitized_name() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("notes.json"));
    let mut store = NoteStore::new(repo).unwrap();
    let topics = Some(vec!["coding".to_string()]);
    let note = store
        .create_note(new_note("Rust: ownership & borrowing", topics))
        .unwrap();

    let path = store.export_note_to_markdown(&note.id, None).unwrap();

    let expected_name = format!("Rust__ownership___borrowing_{}.md", &note.id[..8]);
    assert_eq!(path, dir.path().join(&expected_name));
    assert_eq!(export_file_name(&note), expected_name);

    let body = fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("# Rust: ownership & borrowing\n\n"));
    assert!(body.contains(&format!("**ID**: {}\n", note.id)));
    assert!(body.contains("- Topics: coding\n"));
    assert!(body.ends_with("\n---\n\nLine one\n\n- item\n"));
}

#[test]
fn export_note_honors_explicit_path() {
    let dir = TempDir::new().unwrap();
    let mut store = NoteStore::new(MemoryDocumentRepository::new()).unwrap();
    let note = store.create_note(new_note("plain", None)).unwrap();
    let target = dir.path().join("custom.md");

    let written = store
        .export_note_to_markdown(&note.id, Some(target.as_path()))
        .unwrap();

    assert_eq!(written, target);
    assert!(!fs::read_to_string(&target).unwrap().contains("Topics"));
}

#[test]
fn export_note_unknown_id_is_not_found() {
    let store = NoteStore::new(MemoryDocumentRepository::new()).unwrap();
    let err = store.export_note_to_markdown("missing", None).unwrap_err();
    assert!(matches!(err, NoteStoreError::NotFound(_)));
}

#[test]
fn export_note_into_missing_directory_reports_export_error() {
    let dir = TempDir::new().unwrap();
    let mut store = NoteStore::new(MemoryDocumentRepository::new()).unwrap();
    let note = store.create_note(new_note("x", None)).unwrap();
    let target = dir.path().join("absent").join("x.md");

    let err = store
        .export_note_to_markdown(&note.id, Some(target.as_path()))
        .unwrap_err();
    assert!(matches!(err, NoteStoreError::Export { .. }));
}

#[test]
fn export_all_creates_nested_dir_and_keeps_note_order() {
    let dir = TempDir::new().unwrap();
    let mut store = NoteStore::new(MemoryDocumentRepository::new()).unwrap();
    let first = store.create_note(new_note("first", None)).unwrap();
    let second = store.create_note(new_note("second", None)).unwrap();
    let out_dir = dir.path().join("a").join("b");

    let written = store
        .export_all_notes_to_markdown(Some(out_dir.as_path()))
        .unwrap();

    assert_eq!(
        written,
        vec![
            out_dir.join(export_file_name(&first)),
            out_dir.join(export_file_name(&second)),
        ]
    );
    assert!(written.iter().all(|path| path.exists()));
}

#[test]
fn export_all_defaults_to_exported_notes_dir() {
    let dir = TempDir::new().unwrap();
    let repo = MemoryDocumentRepository::new().with_data_dir(dir.path());
    let mut store = NoteStore::new(repo).unwrap();
    store.create_note(new_note("only", None)).unwrap();

    let written = store.export_all_notes_to_markdown(None).unwrap();

    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with(dir.path().join("exported_notes")));
}

#[test]
fn export_all_with_no_notes_returns_empty_list() {
    let dir = TempDir::new().unwrap();
    let store = NoteStore::new(MemoryDocumentRepository::new()).unwrap();
    let out_dir = dir.path().join("empty");

    let written = store
        .export_all_notes_to_markdown(Some(out_dir.as_path()))
        .unwrap();
    assert!(written.is_empty());
    assert!(out_dir.is_dir());
}
