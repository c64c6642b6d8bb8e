//! JSON file repository with atomic replace.
//!
//! # Responsibility
//! - Load the notes document from one UTF-8 JSON file.
//! - Persist the whole document via temp file + rename in the same directory.
//!
//! # Invariants
//! - A reader of the target path never observes a half-written document.
//! - On any write failure the temp file is removed and the target is untouched.
//! - Output is pretty-printed with 2-space indentation; non-ASCII is kept literal.

use super::document_repo::{DocumentRepository, StorageError, StorageResult};
use crate::model::note::NoteDocument;
use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tempfile::Builder;

const TEMP_PREFIX: &str = ".notes_";
const TEMP_SUFFIX: &str = ".json.tmp";

/// File-backed repository for the notes document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        // Dropping the temp file on any early return removes it from disk.
        let mut temp = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&dir)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl DocumentRepository for JsonFileRepository {
    fn load(&self) -> StorageResult<Option<NoteDocument>> {
        let started_at = Instant::now();
        if !self.path.exists() {
            info!(
                "event=store_load module=repo status=ok mode=seed path={}",
                self.path.display()
            );
            return Ok(None);
        }

        // Bad UTF-8 surfaces from serde as a parse error, i.e. `Corrupt`.
        let raw = fs::read(&self.path).map_err(|source| {
            error!(
                "event=store_load module=repo status=error error_code=read_failed path={} error={}",
                self.path.display(),
                source
            );
            StorageError::Read {
                path: self.path.clone(),
                source,
            }
        })?;

        let document: NoteDocument = serde_json::from_slice(&raw).map_err(|err| {
            error!(
                "event=store_load module=repo status=error error_code=corrupt path={} error={}",
                self.path.display(),
                err
            );
            StorageError::Corrupt {
                path: self.path.clone(),
                message: err.to_string(),
            }
        })?;

        info!(
            "event=store_load module=repo status=ok mode=file notes={} duration_ms={}",
            document.notes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(document))
    }

    fn save(&mut self, document: &NoteDocument) -> StorageResult<()> {
        let started_at = Instant::now();
        let mut bytes =
            serde_json::to_vec_pretty(document).map_err(|err| StorageError::Write {
                path: self.path.clone(),
                source: io::Error::other(err),
            })?;
        bytes.push(b'\n');

        match self.write_atomically(&bytes) {
            Ok(()) => {
                info!(
                    "event=store_persist module=repo status=ok notes={} bytes={} duration_ms={}",
                    document.notes.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_persist module=repo status=error error_code=write_failed path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(StorageError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.parent_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileRepository;
    use crate::model::note::{Note, NoteDocument, NoteTags};
    use crate::repo::document_repo::{DocumentRepository, StorageError};
    use std::fs;
    use tempfile::TempDir;

    fn sample_document() -> NoteDocument {
        let mut document = NoteDocument::default();
        document.notes.push(Note::new(
            "Café plan",
            "naïve body",
            NoteTags {
                category: "work".to_string(),
                kind: "idea".to_string(),
                priority: "soon".to_string(),
                topics: vec!["ai".to_string()],
            },
        ));
        document
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("notes.json"));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn save_writes_pretty_utf8_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        let mut repo = JsonFileRepository::new(&path);

        repo.save(&sample_document()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Café plan"));
        assert!(raw.contains("\n  \"tag_schema\": {"));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".json.tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("notes.json");
        let mut repo = JsonFileRepository::new(&path);

        repo.save(&NoteDocument::default()).unwrap();
        assert!(path.exists());
        assert_eq!(repo.data_dir(), dir.path().join("nested"));
    }

    #[test]
    fn load_rejects_malformed_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{\"tag_schema\": {\"category\": []}").unwrap();

        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn load_rejects_invalid_utf8_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, b"{\"tag_schema\": \xff\xfe }").unwrap();

        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();

        // A non-empty directory at the target path makes the final rename fail.
        let blocked = dir.path().join("blocked");
        fs::create_dir_all(blocked.join("inner")).unwrap();
        let mut blocked_repo = JsonFileRepository::new(&blocked);
        let err = blocked_repo.save(&sample_document()).unwrap_err();

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(blocked.join("inner").is_dir());
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".notes_"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
