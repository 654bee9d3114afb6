//! Backend contract
//!
//! The services never talk to a database directly. They go through two
//! async traits: [`BibleStore`] for the read-only scripture catalog,
//! lexicon and Strong's tagging, and [`AnnotationStore`] for per-user data.
//!
//! Implementations:
//! - `database::PgBibleStore` / `database::PgAnnotationStore` (PostgreSQL via sqlx)
//! - [`memory::InMemoryBibleStore`] (tests and `--demo`)
//!
//! Strong's identifiers are stored in canonical form (`H85`), so every
//! lookup here is a single equality match.

pub mod memory;
pub mod sample;

use async_trait::async_trait;
use bible_types::{
    BibleVersion, Book, Chapter, HistoryType, LexiconEntry, MarkingType, NewMarking,
    NewReadingEntry, Profile, ReadingHistoryEntry, Reference, StrongsWord, TaggedVerse,
    UserMarking, Verse, VerseHit,
};
use uuid::Uuid;

use crate::error::StoreResult;

pub use memory::InMemoryBibleStore;

/// Restrict a query to one version, by id or by code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionFilter {
    Id(Uuid),
    Code(String),
}

impl VersionFilter {
    /// Interpret user input: a UUID selects by id, anything else by code
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(match Uuid::parse_str(value) {
            Ok(id) => VersionFilter::Id(id),
            Err(_) => VersionFilter::Code(value.to_string()),
        })
    }

    pub fn matches(&self, version: &BibleVersion) -> bool {
        match self {
            VersionFilter::Id(id) => version.id == *id,
            VersionFilter::Code(code) => version.code.eq_ignore_ascii_case(code),
        }
    }
}

/// Scope of a reference lookup: one book, a chapter span and optional verses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceQuery {
    pub book: String,
    pub chapter: u32,
    pub chapter_end: u32,
    /// `None` selects every verse of the chapter span
    pub verses: Option<Vec<u32>>,
    pub version: Option<VersionFilter>,
}

impl ReferenceQuery {
    pub fn new(reference: &Reference, version: Option<VersionFilter>) -> Self {
        Self {
            book: reference.book.clone(),
            chapter: reference.chapter,
            chapter_end: reference.last_chapter(),
            verses: reference.verses.clone(),
            version,
        }
    }

    pub fn contains(&self, chapter: i32, verse: i32) -> bool {
        let in_chapters = chapter >= self.chapter as i32 && chapter <= self.chapter_end as i32;
        let in_verses = match &self.verses {
            Some(verses) => verses.iter().any(|v| *v as i32 == verse),
            None => true,
        };
        in_chapters && in_verses
    }
}

/// Read side of the scripture database
#[async_trait]
pub trait BibleStore: Send + Sync {
    /// Active versions ordered by code
    async fn versions(&self) -> StoreResult<Vec<BibleVersion>>;

    async fn version_by_code(&self, code: &str) -> StoreResult<Option<BibleVersion>>;

    /// All books in canonical order
    async fn books(&self) -> StoreResult<Vec<Book>>;

    /// Book by canonical name, case-insensitively
    async fn book_by_name(&self, name: &str) -> StoreResult<Option<Book>>;

    async fn chapter(&self, book_id: Uuid, chapter_number: i32) -> StoreResult<Option<Chapter>>;

    /// Verses of one chapter in one version, ordered by verse number
    async fn chapter_verses(&self, chapter_id: Uuid, version_id: Uuid) -> StoreResult<Vec<Verse>>;

    /// Verses selected by a parsed reference, in canonical order
    async fn find_reference(&self, query: &ReferenceQuery) -> StoreResult<Vec<VerseHit>>;

    /// Full-text search in web-search syntax, at most `limit` hits
    async fn search_text(
        &self,
        term: &str,
        version: Option<&VersionFilter>,
        limit: i64,
    ) -> StoreResult<Vec<VerseHit>>;

    async fn verse(&self, verse_id: Uuid) -> StoreResult<Option<VerseHit>>;

    /// OSIS key of a verse, if it has one
    async fn verse_key(&self, verse_id: Uuid) -> StoreResult<Option<String>>;

    /// The verse sharing `osis` in the version with `version_code`
    async fn verse_by_key(&self, osis: &str, version_code: &str) -> StoreResult<Option<VerseHit>>;

    /// The backend's tagged-verse function (`get_kjv_verse_with_strongs`)
    /// for the verse `osis` of the version with `version_code`
    async fn tagged_verse(
        &self,
        osis: &str,
        version_code: &str,
    ) -> StoreResult<Option<TaggedVerse>>;

    /// Tagged words of a verse ordered by word position
    async fn strongs_words(&self, verse_id: Uuid) -> StoreResult<Vec<StrongsWord>>;

    /// One hit per tagged word carrying `number`; a verse may repeat
    async fn verses_with_strongs(&self, number: &str) -> StoreResult<Vec<VerseHit>>;

    async fn lexicon_entry(&self, number: &str) -> StoreResult<Option<LexiconEntry>>;
}

/// Per-user markings, reading history and profile
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Markings of a user, newest first, optionally of one kind
    async fn markings(
        &self,
        user_id: Uuid,
        kind: Option<MarkingType>,
    ) -> StoreResult<Vec<UserMarking>>;

    async fn find_marking(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        kind: MarkingType,
    ) -> StoreResult<Option<UserMarking>>;

    async fn count_markings(&self, user_id: Uuid, kind: MarkingType) -> StoreResult<i64>;

    async fn add_marking(&self, user_id: Uuid, marking: &NewMarking) -> StoreResult<UserMarking>;

    /// `None` when the marking does not exist or belongs to someone else
    async fn update_content(
        &self,
        user_id: Uuid,
        marking_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<UserMarking>>;

    /// `false` when nothing owned by `user_id` was deleted
    async fn delete_marking(&self, user_id: Uuid, marking_id: Uuid) -> StoreResult<bool>;

    async fn record_reading(
        &self,
        user_id: Uuid,
        entry: &NewReadingEntry,
    ) -> StoreResult<ReadingHistoryEntry>;

    /// Most recent first
    async fn reading_history(
        &self,
        user_id: Uuid,
        kind: Option<HistoryType>,
        limit: i64,
    ) -> StoreResult<Vec<ReadingHistoryEntry>>;

    async fn profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
    ) -> StoreResult<Profile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_filter_distinguishes_ids_from_codes() {
        let id = Uuid::new_v4();
        assert_eq!(VersionFilter::parse(&id.to_string()), Some(VersionFilter::Id(id)));
        assert_eq!(
            VersionFilter::parse(" KJV "),
            Some(VersionFilter::Code("KJV".to_string()))
        );
        assert_eq!(VersionFilter::parse(""), None);
    }

    #[test]
    fn reference_query_covers_chapter_span_and_verses() {
        let span = Reference {
            chapter_end: Some(3),
            ..Reference::chapter("John", 2)
        };
        let query = ReferenceQuery::new(&span, None);
        assert!(query.contains(2, 1));
        assert!(query.contains(3, 36));
        assert!(!query.contains(4, 1));

        let verses = ReferenceQuery::new(&Reference::verses("John", 3, vec![16, 17]), None);
        assert!(verses.contains(3, 17));
        assert!(!verses.contains(3, 18));
    }
}
