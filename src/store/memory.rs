//! In-memory store
//!
//! Implements both store traits over plain vectors behind `tokio::sync::RwLock`.
//! Used by the tests and by `bible --demo`. Strong's identifiers are
//! normalized as rows are inserted, mirroring the normalization the
//! PostgreSQL schema applies on write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bible_types::{
    BibleVersion, Book, Chapter, HistoryType, LexiconEntry, MarkingType, NewMarking,
    NewReadingEntry, Profile, ReadingHistoryEntry, StrongsWord, TaggedVerse, Testament,
    UserMarking, Verse, VerseHit,
};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnnotationStore, BibleStore, ReferenceQuery, VersionFilter};
use crate::error::{StoreError, StoreResult};
use crate::strongs::normalize_strongs;

#[derive(Debug, Clone)]
struct StoredVerse {
    verse: Verse,
    chapter_id: Uuid,
    version_id: Uuid,
    osis: Option<String>,
}

#[derive(Debug, Default)]
struct BibleTables {
    versions: Vec<BibleVersion>,
    books: Vec<Book>,
    chapters: Vec<Chapter>,
    verses: Vec<StoredVerse>,
    words: Vec<StrongsWord>,
    lexicon: HashMap<String, LexiconEntry>,
    /// Rows the tagged-verse backend function would return, by upper-cased
    /// version code and OSIS key
    function_rows: HashMap<(String, String), TaggedVerse>,
}

impl BibleTables {
    fn hit(&self, stored: &StoredVerse) -> Option<VerseHit> {
        let chapter = self.chapters.iter().find(|c| c.id == stored.chapter_id)?;
        let book = self.books.iter().find(|b| b.id == chapter.book_id)?;
        let version = self.versions.iter().find(|v| v.id == stored.version_id);
        Some(VerseHit {
            id: stored.verse.id,
            text: stored.verse.text.clone(),
            verse_number: stored.verse.verse_number,
            chapter_number: chapter.chapter_number,
            book_name: book.name.clone(),
            book_id: book.id,
            chapter_id: chapter.id,
            version_code: version.map(|v| v.code.clone()),
        })
    }

    fn book_order(&self, book_id: Uuid) -> i32 {
        self.books
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| b.book_order)
            .unwrap_or(i32::MAX)
    }

    fn version_matches(&self, version_id: Uuid, filter: Option<&VersionFilter>) -> bool {
        match filter {
            None => true,
            Some(filter) => self
                .versions
                .iter()
                .find(|v| v.id == version_id)
                .is_some_and(|v| filter.matches(v)),
        }
    }

    fn sort_canonically(&self, hits: &mut [VerseHit]) {
        hits.sort_by_key(|h| (self.book_order(h.book_id), h.chapter_number, h.verse_number));
    }
}

#[derive(Debug, Default)]
struct UserTables {
    markings: Vec<UserMarking>,
    history: Vec<ReadingHistoryEntry>,
    profiles: HashMap<Uuid, Profile>,
}

#[derive(Debug, Default)]
pub struct InMemoryBibleStore {
    bible: RwLock<BibleTables>,
    users: RwLock<UserTables>,
    offline: AtomicBool,
}

impl InMemoryBibleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every catalog read fail, to exercise degraded paths
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self, operation: &str) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{} while offline", operation)));
        }
        Ok(())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub async fn add_version(&self, code: &str, name: &str, language: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.bible.write().await.versions.push(BibleVersion {
            id,
            code: code.to_string(),
            name: name.to_string(),
            language: language.to_string(),
            is_active: true,
        });
        id
    }

    pub async fn add_book(
        &self,
        name: &str,
        testament: Testament,
        chapters_count: i32,
        book_order: i32,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.bible.write().await.books.push(Book {
            id,
            name: name.to_string(),
            testament,
            chapters_count,
            book_order,
        });
        id
    }

    pub async fn add_chapter(&self, book_id: Uuid, chapter_number: i32, verses_count: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.bible.write().await.chapters.push(Chapter {
            id,
            book_id,
            chapter_number,
            verses_count,
        });
        id
    }

    pub async fn add_verse(
        &self,
        chapter_id: Uuid,
        version_id: Uuid,
        verse_number: i32,
        text: &str,
        osis: Option<&str>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.bible.write().await.verses.push(StoredVerse {
            verse: Verse {
                id,
                verse_number,
                text: text.to_string(),
                audio_url: None,
            },
            chapter_id,
            version_id,
            osis: osis.map(str::to_string),
        });
        id
    }

    /// Attach tagged words to a verse, numbering them in order
    pub async fn add_strongs_words(&self, verse_id: Uuid, words: &[(&str, Option<&str>)]) {
        let mut bible = self.bible.write().await;
        let start = bible.words.iter().filter(|w| w.verse_id == verse_id).count() as i32;
        for (offset, (text, number)) in words.iter().enumerate() {
            bible.words.push(StrongsWord {
                verse_id,
                word_order: start + offset as i32 + 1,
                word_text: text.to_string(),
                strongs_number: number.and_then(normalize_strongs),
            });
        }
    }

    /// Insert a lexicon row; the key is stored in canonical form
    pub async fn add_lexicon_entry(&self, mut entry: LexiconEntry) {
        if let Some(canonical) = normalize_strongs(&entry.strongs_number) {
            entry.strongs_number = canonical;
        }
        self.bible
            .write()
            .await
            .lexicon
            .insert(entry.strongs_number.clone(), entry);
    }

    /// Register a row for the tagged-verse backend function
    pub async fn add_tagged_verse_row(&self, version_code: &str, row: TaggedVerse) {
        self.bible
            .write()
            .await
            .function_rows
            .insert((version_code.to_uppercase(), row.osis.clone()), row);
    }
}

#[async_trait]
impl BibleStore for InMemoryBibleStore {
    async fn versions(&self) -> StoreResult<Vec<BibleVersion>> {
        self.ensure_online("versions")?;
        let bible = self.bible.read().await;
        let mut versions: Vec<BibleVersion> =
            bible.versions.iter().filter(|v| v.is_active).cloned().collect();
        versions.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(versions)
    }

    async fn version_by_code(&self, code: &str) -> StoreResult<Option<BibleVersion>> {
        self.ensure_online("version_by_code")?;
        let bible = self.bible.read().await;
        Ok(bible
            .versions
            .iter()
            .find(|v| v.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn books(&self) -> StoreResult<Vec<Book>> {
        self.ensure_online("books")?;
        let bible = self.bible.read().await;
        let mut books = bible.books.clone();
        books.sort_by_key(|b| b.book_order);
        Ok(books)
    }

    async fn book_by_name(&self, name: &str) -> StoreResult<Option<Book>> {
        self.ensure_online("book_by_name")?;
        let bible = self.bible.read().await;
        Ok(bible
            .books
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn chapter(&self, book_id: Uuid, chapter_number: i32) -> StoreResult<Option<Chapter>> {
        self.ensure_online("chapter")?;
        let bible = self.bible.read().await;
        Ok(bible
            .chapters
            .iter()
            .find(|c| c.book_id == book_id && c.chapter_number == chapter_number)
            .cloned())
    }

    async fn chapter_verses(&self, chapter_id: Uuid, version_id: Uuid) -> StoreResult<Vec<Verse>> {
        self.ensure_online("chapter_verses")?;
        let bible = self.bible.read().await;
        let mut verses: Vec<Verse> = bible
            .verses
            .iter()
            .filter(|v| v.chapter_id == chapter_id && v.version_id == version_id)
            .map(|v| v.verse.clone())
            .collect();
        verses.sort_by_key(|v| v.verse_number);
        Ok(verses)
    }

    async fn find_reference(&self, query: &ReferenceQuery) -> StoreResult<Vec<VerseHit>> {
        self.ensure_online("find_reference")?;
        let bible = self.bible.read().await;
        let mut hits: Vec<VerseHit> = bible
            .verses
            .iter()
            .filter(|v| bible.version_matches(v.version_id, query.version.as_ref()))
            .filter_map(|v| bible.hit(v))
            .filter(|h| h.book_name.eq_ignore_ascii_case(&query.book))
            .filter(|h| query.contains(h.chapter_number, h.verse_number))
            .collect();
        bible.sort_canonically(&mut hits);
        Ok(hits)
    }

    async fn search_text(
        &self,
        term: &str,
        version: Option<&VersionFilter>,
        limit: i64,
    ) -> StoreResult<Vec<VerseHit>> {
        self.ensure_online("search_text")?;
        let query = WebSearchQuery::parse(term);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let bible = self.bible.read().await;
        let mut hits: Vec<VerseHit> = bible
            .verses
            .iter()
            .filter(|v| bible.version_matches(v.version_id, version))
            .filter(|v| query.matches(&v.verse.text))
            .filter_map(|v| bible.hit(v))
            .collect();
        bible.sort_canonically(&mut hits);
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }

    async fn verse(&self, verse_id: Uuid) -> StoreResult<Option<VerseHit>> {
        self.ensure_online("verse")?;
        let bible = self.bible.read().await;
        Ok(bible
            .verses
            .iter()
            .find(|v| v.verse.id == verse_id)
            .and_then(|v| bible.hit(v)))
    }

    async fn verse_key(&self, verse_id: Uuid) -> StoreResult<Option<String>> {
        self.ensure_online("verse_key")?;
        let bible = self.bible.read().await;
        Ok(bible
            .verses
            .iter()
            .find(|v| v.verse.id == verse_id)
            .and_then(|v| v.osis.clone()))
    }

    async fn verse_by_key(&self, osis: &str, version_code: &str) -> StoreResult<Option<VerseHit>> {
        self.ensure_online("verse_by_key")?;
        let bible = self.bible.read().await;
        let filter = VersionFilter::Code(version_code.to_string());
        Ok(bible
            .verses
            .iter()
            .filter(|v| v.osis.as_deref() == Some(osis))
            .find(|v| bible.version_matches(v.version_id, Some(&filter)))
            .and_then(|v| bible.hit(v)))
    }

    async fn tagged_verse(
        &self,
        osis: &str,
        version_code: &str,
    ) -> StoreResult<Option<TaggedVerse>> {
        self.ensure_online("get_kjv_verse_with_strongs")?;
        let key = (version_code.to_uppercase(), osis.to_string());
        Ok(self.bible.read().await.function_rows.get(&key).cloned())
    }

    async fn strongs_words(&self, verse_id: Uuid) -> StoreResult<Vec<StrongsWord>> {
        self.ensure_online("strongs_words")?;
        let bible = self.bible.read().await;
        let mut words: Vec<StrongsWord> = bible
            .words
            .iter()
            .filter(|w| w.verse_id == verse_id)
            .cloned()
            .collect();
        words.sort_by_key(|w| w.word_order);
        Ok(words)
    }

    async fn verses_with_strongs(&self, number: &str) -> StoreResult<Vec<VerseHit>> {
        self.ensure_online("verses_with_strongs")?;
        let bible = self.bible.read().await;
        Ok(bible
            .words
            .iter()
            .filter(|w| w.strongs_number.as_deref() == Some(number))
            .filter_map(|w| bible.verses.iter().find(|v| v.verse.id == w.verse_id))
            .filter_map(|v| bible.hit(v))
            .collect())
    }

    async fn lexicon_entry(&self, number: &str) -> StoreResult<Option<LexiconEntry>> {
        self.ensure_online("lexicon_entry")?;
        Ok(self.bible.read().await.lexicon.get(number).cloned())
    }
}

#[async_trait]
impl AnnotationStore for InMemoryBibleStore {
    async fn markings(
        &self,
        user_id: Uuid,
        kind: Option<MarkingType>,
    ) -> StoreResult<Vec<UserMarking>> {
        let users = self.users.read().await;
        let mut markings: Vec<UserMarking> = users
            .markings
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| kind.is_none_or(|k| m.marking_type == k))
            .cloned()
            .collect();
        markings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(markings)
    }

    async fn find_marking(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        kind: MarkingType,
    ) -> StoreResult<Option<UserMarking>> {
        let users = self.users.read().await;
        Ok(users
            .markings
            .iter()
            .find(|m| m.user_id == user_id && m.verse_id == verse_id && m.marking_type == kind)
            .cloned())
    }

    async fn count_markings(&self, user_id: Uuid, kind: MarkingType) -> StoreResult<i64> {
        let users = self.users.read().await;
        Ok(users
            .markings
            .iter()
            .filter(|m| m.user_id == user_id && m.marking_type == kind)
            .count() as i64)
    }

    async fn add_marking(&self, user_id: Uuid, marking: &NewMarking) -> StoreResult<UserMarking> {
        let now = Utc::now();
        let created = UserMarking {
            id: Uuid::new_v4(),
            user_id,
            verse_id: marking.verse_id,
            marking_type: marking.marking_type,
            color: marking.color.clone(),
            content: marking.content.clone(),
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.markings.push(created.clone());
        Ok(created)
    }

    async fn update_content(
        &self,
        user_id: Uuid,
        marking_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<UserMarking>> {
        let mut users = self.users.write().await;
        let Some(marking) = users
            .markings
            .iter_mut()
            .find(|m| m.id == marking_id && m.user_id == user_id)
        else {
            return Ok(None);
        };
        marking.content = Some(content.to_string());
        marking.updated_at = Utc::now();
        Ok(Some(marking.clone()))
    }

    async fn delete_marking(&self, user_id: Uuid, marking_id: Uuid) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let before = users.markings.len();
        users
            .markings
            .retain(|m| !(m.id == marking_id && m.user_id == user_id));
        Ok(users.markings.len() < before)
    }

    async fn record_reading(
        &self,
        user_id: Uuid,
        entry: &NewReadingEntry,
    ) -> StoreResult<ReadingHistoryEntry> {
        let (book_name, version_code) = {
            let bible = self.bible.read().await;
            let book = bible
                .books
                .iter()
                .find(|b| b.id == entry.book_id)
                .ok_or_else(|| {
                    StoreError::decode("books", format!("no book with id {}", entry.book_id))
                })?;
            let version_code = entry.version_id.and_then(|id| {
                bible
                    .versions
                    .iter()
                    .find(|v| v.id == id)
                    .map(|v| v.code.clone())
            });
            (book.name.clone(), version_code)
        };

        let recorded = ReadingHistoryEntry {
            id: Uuid::new_v4(),
            user_id,
            book_id: entry.book_id,
            book_name,
            chapter_number: entry.chapter_number,
            verse_number: entry.verse_number,
            version_code,
            history_type: entry.history_type,
            last_read_at: Utc::now(),
        };
        self.users.write().await.history.push(recorded.clone());
        Ok(recorded)
    }

    async fn reading_history(
        &self,
        user_id: Uuid,
        kind: Option<HistoryType>,
        limit: i64,
    ) -> StoreResult<Vec<ReadingHistoryEntry>> {
        let users = self.users.read().await;
        // Insertion order breaks ties between identical timestamps.
        let mut history: Vec<(usize, ReadingHistoryEntry)> = users
            .history
            .iter()
            .enumerate()
            .filter(|(_, h)| h.user_id == user_id)
            .filter(|(_, h)| kind.is_none_or(|k| h.history_type == k))
            .map(|(i, h)| (i, h.clone()))
            .collect();
        history.sort_by(|(ia, a), (ib, b)| b.last_read_at.cmp(&a.last_read_at).then(ib.cmp(ia)));
        Ok(history
            .into_iter()
            .map(|(_, h)| h)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.users.read().await.profiles.get(&user_id).cloned())
    }

    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
    ) -> StoreResult<Profile> {
        let profile = Profile {
            user_id,
            display_name: display_name.map(str::to_string),
            updated_at: Utc::now(),
        };
        self.users
            .write()
            .await
            .profiles
            .insert(user_id, profile.clone());
        Ok(profile)
    }
}

/// The subset of web-search syntax the in-memory store understands:
/// bare words and quoted phrases must all occur, `-word` must not, and
/// `or` between terms makes either side sufficient.
#[derive(Debug, Default)]
struct WebSearchQuery {
    /// Alternatives; each is a list of required terms
    any_of: Vec<Vec<String>>,
    excluded: Vec<String>,
}

impl WebSearchQuery {
    fn parse(term: &str) -> Self {
        let mut query = WebSearchQuery::default();
        let mut current: Vec<String> = Vec::new();
        let mut rest = term.trim();

        while !rest.is_empty() {
            let (token, quoted, remainder) = if let Some(stripped) = rest.strip_prefix('"') {
                match stripped.find('"') {
                    Some(end) => (&stripped[..end], true, &stripped[end + 1..]),
                    None => (stripped, true, ""),
                }
            } else {
                match rest.find(char::is_whitespace) {
                    Some(end) => (&rest[..end], false, &rest[end..]),
                    None => (rest, false, ""),
                }
            };
            rest = remainder.trim_start();

            let token = token.trim().to_lowercase();
            if token.is_empty() {
                continue;
            }
            if !quoted && token == "or" {
                if !current.is_empty() {
                    query.any_of.push(std::mem::take(&mut current));
                }
                continue;
            }
            match token.strip_prefix('-') {
                Some(excluded) if !quoted && !excluded.is_empty() => {
                    query.excluded.push(excluded.to_string())
                }
                _ => current.push(token),
            }
        }
        if !current.is_empty() {
            query.any_of.push(current);
        }
        query
    }

    fn is_empty(&self) -> bool {
        self.any_of.is_empty()
    }

    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.any_of
            .iter()
            .any(|terms| terms.iter().all(|t| text.contains(t.as_str())))
            && !self.excluded.iter().any(|t| text.contains(t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_search_terms_phrases_and_exclusions() {
        let query = WebSearchQuery::parse(r#""loved the world" -hate"#);
        assert!(query.matches("For God so loved the world"));
        assert!(!query.matches("the world loved"));
        assert!(!query.matches("loved the world and hate"));

        let either = WebSearchQuery::parse("light or darkness");
        assert!(either.matches("ye are the light"));
        assert!(either.matches("darkness fell"));
        assert!(!either.matches("salt of the earth"));

        assert!(WebSearchQuery::parse("   ").is_empty());
    }

    #[tokio::test]
    async fn lexicon_keys_are_normalized_on_insert() {
        let store = InMemoryBibleStore::new();
        store
            .add_lexicon_entry(LexiconEntry {
                strongs_number: "H0085".to_string(),
                lemma: "אַבְרָהָם".to_string(),
                ..Default::default()
            })
            .await;
        assert!(store.lexicon_entry("H85").await.unwrap().is_some());
        assert!(store.lexicon_entry("H0085").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn offline_store_fails_catalog_reads() {
        let store = InMemoryBibleStore::new();
        store.set_offline(true);
        assert!(matches!(store.books().await, Err(StoreError::Unavailable(_))));
        store.set_offline(false);
        assert!(store.books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_requires_ownership() {
        let store = InMemoryBibleStore::new();
        let owner = Uuid::new_v4();
        let marking = store
            .add_marking(
                owner,
                &NewMarking {
                    verse_id: Uuid::new_v4(),
                    marking_type: MarkingType::Note,
                    color: None,
                    content: Some("remember".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(!store.delete_marking(Uuid::new_v4(), marking.id).await.unwrap());
        assert!(store.delete_marking(owner, marking.id).await.unwrap());
        assert!(store.markings(owner, None).await.unwrap().is_empty());
    }
}
