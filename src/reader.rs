//! Chapter reader
//!
//! Loads one chapter of one version through the chain
//! version -> book -> chapter -> verses. Each step depends on the previous
//! one, so the lookups run sequentially and any missing link ends the chain
//! with `None`.

use std::sync::Arc;

use bible_types::{BibleVersion, Book, ChapterWithVerses};
use tracing::debug;

use crate::error::BibleResult;
use crate::reference::{finnish_name, normalize_book_name};
use crate::store::BibleStore;

pub struct ReaderService {
    store: Arc<dyn BibleStore>,
    default_version: String,
}

impl ReaderService {
    pub fn new(store: Arc<dyn BibleStore>, default_version: impl Into<String>) -> Self {
        Self {
            store,
            default_version: default_version.into(),
        }
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Active versions ordered by code
    pub async fn versions(&self) -> BibleResult<Vec<BibleVersion>> {
        Ok(self.store.versions().await?)
    }

    /// Books in canonical order
    pub async fn books(&self) -> BibleResult<Vec<Book>> {
        Ok(self.store.books().await?)
    }

    /// Number of chapters in a book, from a name or abbreviation
    pub async fn chapter_count(&self, book: &str) -> BibleResult<Option<i32>> {
        let name = normalize_book_name(book);
        Ok(self
            .store
            .book_by_name(&name)
            .await?
            .map(|book| book.chapters_count))
    }

    /// One chapter with its verses; `version` defaults to the reading version
    pub async fn chapter(
        &self,
        book: &str,
        chapter: u32,
        version: Option<&str>,
    ) -> BibleResult<Option<ChapterWithVerses>> {
        let version_code = version.unwrap_or(&self.default_version);
        let name = normalize_book_name(book);
        debug!("Loading {} {} in {}", name, chapter, version_code);

        let Some(version) = self.store.version_by_code(version_code).await? else {
            debug!("Unknown version {}", version_code);
            return Ok(None);
        };
        let Some(book) = self.store.book_by_name(&name).await? else {
            debug!("Unknown book {}", name);
            return Ok(None);
        };
        let Ok(chapter_number) = i32::try_from(chapter) else {
            return Ok(None);
        };
        let Some(chapter_row) = self.store.chapter(book.id, chapter_number).await? else {
            debug!("{} has no chapter {}", book.name, chapter);
            return Ok(None);
        };
        let verses = self.store.chapter_verses(chapter_row.id, version.id).await?;

        Ok(Some(ChapterWithVerses {
            display_name: Some(finnish_name(&book.name)),
            book: book.name,
            chapter,
            version_code: version.code,
            verses,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample::sample_store;

    #[tokio::test]
    async fn chapter_follows_the_lookup_chain() {
        let reader = ReaderService::new(Arc::new(sample_store().await), "KR92");

        let chapter = reader.chapter("1. Joh", 1, None).await.unwrap().unwrap();
        assert_eq!(chapter.book, "I John");
        assert_eq!(chapter.version_code, "KR92");
        assert_eq!(chapter.display_name.as_deref(), Some("1. Johanneksen kirje"));
        let numbers: Vec<i32> = chapter.verses.iter().map(|v| v.verse_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn missing_links_end_the_chain() {
        let reader = ReaderService::new(Arc::new(sample_store().await), "KR92");
        assert!(reader.chapter("John", 3, Some("NIV")).await.unwrap().is_none());
        assert!(reader.chapter("Obadiah", 1, None).await.unwrap().is_none());
        assert!(reader.chapter("John", 20, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn chapter_count_accepts_abbreviations() {
        let reader = ReaderService::new(Arc::new(sample_store().await), "KR92");
        assert_eq!(reader.chapter_count("Matt").await.unwrap(), Some(28));
        assert_eq!(reader.chapter_count("Nowhere").await.unwrap(), None);
    }
}
