//! Last reading position on this device
//!
//! A single JSON document, overwritten every time a chapter is opened.
//! Writes go to a temporary file in the same directory which then replaces
//! the old file, so a crash never leaves a half-written position behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bible_types::ReadingPosition;
use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::BibleResult;

#[derive(Debug, Clone)]
pub struct PositionFile {
    path: PathBuf,
}

impl PositionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved position; missing or unreadable files count as none
    pub fn load(&self) -> Option<ReadingPosition> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(position) => Some(position),
            Err(e) => {
                warn!("Ignoring corrupt position file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Replace the saved position
    pub fn save(&self, position: &ReadingPosition) -> BibleResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut file, position)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            "Saved position {} {} ({})",
            position.book_name, position.chapter, position.version_code
        );
        Ok(())
    }

    /// Save `book chapter` in `version` stamped with the current time
    pub fn record(&self, book_name: &str, chapter: u32, version_code: &str) -> BibleResult<ReadingPosition> {
        let position = ReadingPosition {
            book_name: book_name.to_string(),
            chapter,
            version_code: version_code.to_string(),
            saved_at: Utc::now(),
        };
        self.save(&position)?;
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_no_position() {
        let dir = tempfile::tempdir().unwrap();
        let file = PositionFile::new(dir.path().join("position.json"));
        assert!(file.load().is_none());
    }

    #[test]
    fn save_then_load_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = PositionFile::new(dir.path().join("nested").join("position.json"));

        file.record("John", 3, "KR92").unwrap();
        let saved = file.load().unwrap();
        assert_eq!(saved.book_name, "John");
        assert_eq!(saved.chapter, 3);

        file.record("I John", 1, "KJV").unwrap();
        let saved = file.load().unwrap();
        assert_eq!(saved.book_name, "I John");
        assert_eq!(saved.version_code, "KJV");

        let leftovers = fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(PositionFile::new(path).load().is_none());
    }
}
