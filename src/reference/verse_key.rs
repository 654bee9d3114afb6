//! OSIS verse keys
//!
//! A verse key identifies one logical verse independently of any
//! translation, so the same verse can be joined across version tables even
//! when their chapter/verse numbering differs. The backend assigns keys of
//! the form `<Book>.<Chapter>.<Verse>` using canonical book names, e.g.
//! `I John.1.2`; the application only reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BibleError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseKey {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Like [`VerseKey::new`], rejecting an empty book or a zero position
    pub fn checked(book: impl Into<String>, chapter: u32, verse: u32) -> Result<Self, BibleError> {
        let key = Self::new(book, chapter, verse);
        if key.book.trim().is_empty() || chapter == 0 || verse == 0 {
            return Err(BibleError::InvalidVerseKey(key.to_string()));
        }
        Ok(key)
    }

    pub fn osis(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseKey {
    type Err = BibleError;

    /// Parsed from the right: book names may contain spaces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BibleError::InvalidVerseKey(s.to_string());
        let mut parts = s.trim().rsplitn(3, '.');
        let verse = parts.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let chapter = parts.next().and_then(|c| c.parse().ok()).ok_or_else(invalid)?;
        let book = parts.next().map(str::trim).filter(|b| !b.is_empty()).ok_or_else(invalid)?;
        if chapter == 0 || verse == 0 {
            return Err(invalid());
        }
        Ok(Self::new(book, chapter, verse))
    }
}

impl TryFrom<String> for VerseKey {
    type Error = BibleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VerseKey> for String {
    fn from(key: VerseKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_names_with_spaces() {
        let key: VerseKey = "Song of Solomon.2.1".parse().unwrap();
        assert_eq!(key, VerseKey::new("Song of Solomon", 2, 1));
        assert_eq!(key.osis(), "Song of Solomon.2.1");

        let key: VerseKey = "I John.1.2".parse().unwrap();
        assert_eq!(key.book, "I John");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["John.3", "John.x.16", ".3.16", "John.0.1", "John.3.16a", ""] {
            assert!(bad.parse::<VerseKey>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn serializes_as_osis_string() {
        let json = serde_json::to_string(&VerseKey::new("John", 3, 16)).unwrap();
        assert_eq!(json, "\"John.3.16\"");
        let back: VerseKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VerseKey::new("John", 3, 16));
    }
}
