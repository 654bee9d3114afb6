//! Bible Types - Foundation Types
//!
//! Pure data structures shared by the stores, the services and the HTTP API.
//! Everything here is serializable and free of business logic; parsing,
//! normalization and resolution live in the `bible-study` crate.
//!
//! ## Rules
//!
//! 1. **NO BUSINESS LOGIC** - only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - every type crossing the HTTP boundary supports serde
//! 4. Tagged enums use `#[serde(tag = "type")]`
//!
//! Strong's numbers and verse keys travel as their canonical string forms
//! (`"H85"`, `"I John.1.2"`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// REFERENCES AND SEARCH
// ============================================================================

/// A parsed scripture reference such as `1.Joh.1:2-5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Canonical book identifier (`"I John"`), or the cleaned token when unrecognized
    pub book: String,
    /// First (or only) chapter, 1-based
    pub chapter: u32,
    /// Last chapter of a chapter range (`Joh 2-5`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_end: Option<u32>,
    /// Ascending verse numbers; `None` means the whole chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verses: Option<Vec<u32>>,
}

impl Reference {
    /// Reference to a whole chapter
    pub fn chapter(book: impl Into<String>, chapter: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            chapter_end: None,
            verses: None,
        }
    }

    /// Reference to explicit verses of one chapter
    pub fn verses(book: impl Into<String>, chapter: u32, verses: Vec<u32>) -> Self {
        Self {
            book: book.into(),
            chapter,
            chapter_end: None,
            verses: Some(verses),
        }
    }

    /// Last chapter covered by this reference
    pub fn last_chapter(&self) -> u32 {
        self.chapter_end.unwrap_or(self.chapter)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)?;
        if let Some(end) = self.chapter_end {
            return write!(f, "-{}", end);
        }
        match self.verses.as_deref() {
            Some([single]) => write!(f, ":{}", single),
            Some([first, .., last]) => write!(f, ":{}-{}", first, last),
            _ => Ok(()),
        }
    }
}

/// How a search query was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Reference,
    Text,
}

/// A verse row joined with its chapter, book and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseHit {
    pub id: Uuid,
    pub text: String,
    pub verse_number: i32,
    pub chapter_number: i32,
    pub book_name: String,
    pub book_id: Uuid,
    pub chapter_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<String>,
}

/// Result of a reference or text search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub verses: Vec<VerseHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// User-visible notice when the backend call failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SearchResult {
    /// Empty result of the given kind
    pub fn empty(kind: SearchKind) -> Self {
        Self {
            kind,
            verses: Vec::new(),
            reference: None,
            notice: None,
        }
    }
}

/// Verses containing a word tagged with one Strong's number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongsSearchResult {
    pub verses: Vec<VerseHit>,
    pub total_count: usize,
    pub search_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

// ============================================================================
// CATALOG: VERSIONS, BOOKS, CHAPTERS, VERSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleVersion {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub language: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

impl Testament {
    pub fn as_str(&self) -> &'static str {
        match self {
            Testament::Old => "old",
            Testament::New => "new",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "old" | "ot" => Some(Testament::Old),
            "new" | "nt" => Some(Testament::New),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    pub testament: Testament,
    pub chapters_count: i32,
    pub book_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Uuid,
    pub book_id: Uuid,
    pub chapter_number: i32,
    pub verses_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub id: Uuid,
    pub verse_number: i32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// One chapter of one version, ready for the reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterWithVerses {
    pub book: String,
    /// Localized display name of the book, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub chapter: u32,
    pub version_code: String,
    pub verses: Vec<Verse>,
}

// ============================================================================
// STRONG'S TAGGING AND LEXICON
// ============================================================================

/// A verse of the Strong's-tagged version, keyed by OSIS reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedVerse {
    pub osis: String,
    pub plain_text: String,
    /// Text in bracket form: `In<H7225> the beginning<H430>`
    pub tagged_text: String,
}

/// One word of a tagged verse as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongsWord {
    pub verse_id: Uuid,
    pub word_order: i32,
    pub word_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strongs_number: Option<String>,
}

/// A renderable unit of tagged text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextSpan {
    Plain { text: String },
    Tagged { text: String, strongs: Vec<String> },
}

impl TextSpan {
    pub fn text(&self) -> &str {
        match self {
            TextSpan::Plain { text } | TextSpan::Tagged { text, .. } => text,
        }
    }

    pub fn strongs(&self) -> &[String] {
        match self {
            TextSpan::Plain { .. } => &[],
            TextSpan::Tagged { strongs, .. } => strongs,
        }
    }
}

/// A row of the Strong's lexicon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub strongs_number: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub transliterations: Vec<String>,
    #[serde(default)]
    pub pronunciations: Vec<String>,
    #[serde(default)]
    pub derivation: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definition_short: String,
    #[serde(default)]
    pub definition_lit: String,
    #[serde(default)]
    pub definition_long: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub compare: Vec<String>,
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// A clickable lexicon cross-reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLink {
    /// Canonical number, or the raw identifier when it could not be parsed
    pub strongs_number: String,
    /// Lemma of the target entry, or the raw identifier as fallback
    pub display: String,
    pub resolved: bool,
}

/// Lexicon definition text split into plain runs and cross-references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LexiconSegment {
    Text { text: String },
    Link { link: TagLink },
}

/// Everything needed to render one lexicon entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconCard {
    pub strongs_number: String,
    /// `None` when the entry is missing; the card then shows the raw identifier
    pub entry: Option<LexiconEntry>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    pub derivation: Vec<LexiconSegment>,
    pub notes: Vec<LexiconSegment>,
    pub compare: Vec<TagLink>,
    pub see_also: Vec<TagLink>,
}

/// A verse opened for word study: the reading version beside the tagged version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseStudy {
    pub osis: String,
    pub book: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub chapter: u32,
    pub verse: u32,
    pub source: Option<VerseHit>,
    pub tagged: Option<TaggedVerse>,
    pub spans: Vec<TextSpan>,
}

// ============================================================================
// USER DATA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkingType {
    Highlight,
    Note,
    Comment,
    Bookmark,
}

impl MarkingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkingType::Highlight => "highlight",
            MarkingType::Note => "note",
            MarkingType::Comment => "comment",
            MarkingType::Bookmark => "bookmark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "highlight" => Some(MarkingType::Highlight),
            "note" => Some(MarkingType::Note),
            "comment" => Some(MarkingType::Comment),
            "bookmark" => Some(MarkingType::Bookmark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMarking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub verse_id: Uuid,
    pub marking_type: MarkingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a marking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMarking {
    pub verse_id: Uuid,
    pub marking_type: MarkingType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryType {
    Read,
    Listen,
}

impl HistoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::Read => "read",
            HistoryType::Listen => "listen",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(HistoryType::Read),
            "listen" => Some(HistoryType::Listen),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingHistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub book_name: String,
    pub chapter_number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<String>,
    pub history_type: HistoryType,
    pub last_read_at: DateTime<Utc>,
}

impl ReadingHistoryEntry {
    /// `John 3:16` / `John 3`
    pub fn label(&self) -> String {
        match self.verse_number {
            Some(verse) => format!("{} {}:{}", self.book_name, self.chapter_number, verse),
            None => format!("{} {}", self.book_name, self.chapter_number),
        }
    }
}

/// Request to record a reading (or listening) event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReadingEntry {
    pub book_id: Uuid,
    pub chapter_number: i32,
    #[serde(default)]
    pub verse_number: Option<i32>,
    #[serde(default)]
    pub version_id: Option<Uuid>,
    pub history_type: HistoryType,
}

/// Counters and last positions shown in the sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub highlights_count: i64,
    pub comments_count: i64,
    pub bookmarks_count: i64,
    pub last_read: Option<ReadingHistoryEntry>,
    pub last_listened: Option<ReadingHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Last place the reader was on this device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPosition {
    pub book_name: String,
    pub chapter: u32,
    pub version_code: String,
    pub saved_at: DateTime<Utc>,
}

// ============================================================================
// API ENVELOPE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
