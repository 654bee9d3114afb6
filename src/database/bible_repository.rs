//! Scripture repository: versions, books, chapters, verses, OSIS keys,
//! Strong's words and the lexicon.
//!
//! Every query has its own `FromRow` row type which is converted into the
//! shared `bible_types` structures at this boundary.

use async_trait::async_trait;
use bible_types::{
    BibleVersion, Book, Chapter, LexiconEntry, StrongsWord, TaggedVerse, Testament, Verse,
    VerseHit,
};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{BibleStore, ReferenceQuery, VersionFilter};

/// Verse-hit projection; the argument supplies the FROM tail after the joins
macro_rules! verse_hit_query {
    ($from:literal, $tail:literal) => {
        concat!(
            r#"SELECT v.id, v.text, v.verse_number, c.chapter_number,
                      b.name AS book_name, b.id AS book_id, c.id AS chapter_id,
                      bv.code AS version_code
               "#,
            $from,
            r#"
               JOIN chapters c ON c.id = v.chapter_id
               JOIN books b ON b.id = c.book_id
               JOIN bible_versions bv ON bv.id = v.version_id
               "#,
            $tail
        )
    };
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, FromRow)]
struct VersionRow {
    id: Uuid,
    code: String,
    name: String,
    language: String,
    is_active: bool,
}

impl From<VersionRow> for BibleVersion {
    fn from(row: VersionRow) -> Self {
        BibleVersion {
            id: row.id,
            code: row.code,
            name: row.name,
            language: row.language,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, FromRow)]
struct BookRow {
    id: Uuid,
    name: String,
    testament: String,
    chapters_count: i32,
    book_order: i32,
}

impl TryFrom<BookRow> for Book {
    type Error = StoreError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let testament = Testament::parse(&row.testament).ok_or_else(|| {
            StoreError::decode("books", format!("unknown testament '{}'", row.testament))
        })?;
        Ok(Book {
            id: row.id,
            name: row.name,
            testament,
            chapters_count: row.chapters_count,
            book_order: row.book_order,
        })
    }
}

#[derive(Debug, FromRow)]
struct ChapterRow {
    id: Uuid,
    book_id: Uuid,
    chapter_number: i32,
    verses_count: i32,
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Chapter {
            id: row.id,
            book_id: row.book_id,
            chapter_number: row.chapter_number,
            verses_count: row.verses_count,
        }
    }
}

#[derive(Debug, FromRow)]
struct VerseRow {
    id: Uuid,
    verse_number: i32,
    text: String,
    audio_url: Option<String>,
}

impl From<VerseRow> for Verse {
    fn from(row: VerseRow) -> Self {
        Verse {
            id: row.id,
            verse_number: row.verse_number,
            text: row.text,
            audio_url: row.audio_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct VerseHitRow {
    id: Uuid,
    text: String,
    verse_number: i32,
    chapter_number: i32,
    book_name: String,
    book_id: Uuid,
    chapter_id: Uuid,
    version_code: Option<String>,
}

impl From<VerseHitRow> for VerseHit {
    fn from(row: VerseHitRow) -> Self {
        VerseHit {
            id: row.id,
            text: row.text,
            verse_number: row.verse_number,
            chapter_number: row.chapter_number,
            book_name: row.book_name,
            book_id: row.book_id,
            chapter_id: row.chapter_id,
            version_code: row.version_code,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaggedVerseRow {
    osis: String,
    plain_text: Option<String>,
    tagged_text: Option<String>,
}

impl From<TaggedVerseRow> for TaggedVerse {
    fn from(row: TaggedVerseRow) -> Self {
        let plain_text = row.plain_text.unwrap_or_default();
        TaggedVerse {
            osis: row.osis,
            tagged_text: row.tagged_text.unwrap_or_else(|| plain_text.clone()),
            plain_text,
        }
    }
}

#[derive(Debug, FromRow)]
struct StrongsWordRow {
    verse_id: Uuid,
    word_order: i32,
    word_text: String,
    strongs_number: Option<String>,
}

impl From<StrongsWordRow> for StrongsWord {
    fn from(row: StrongsWordRow) -> Self {
        StrongsWord {
            verse_id: row.verse_id,
            word_order: row.word_order,
            word_text: row.word_text,
            strongs_number: row.strongs_number,
        }
    }
}

#[derive(Debug, FromRow)]
struct LexiconRow {
    strongs_number: String,
    language: Option<String>,
    lemma: Option<String>,
    transliterations: Option<Vec<String>>,
    pronunciations: Option<Vec<String>>,
    derivation: Option<String>,
    part_of_speech: Option<String>,
    definition_short: Option<String>,
    definition_lit: Option<String>,
    definition_long: Option<String>,
    notes: Option<String>,
    compare: Option<Vec<String>>,
    see_also: Option<Vec<String>>,
}

impl From<LexiconRow> for LexiconEntry {
    fn from(row: LexiconRow) -> Self {
        LexiconEntry {
            strongs_number: row.strongs_number,
            language: row.language.unwrap_or_default(),
            lemma: row.lemma.unwrap_or_default(),
            transliterations: row.transliterations.unwrap_or_default(),
            pronunciations: row.pronunciations.unwrap_or_default(),
            derivation: row.derivation.unwrap_or_default(),
            part_of_speech: row.part_of_speech.unwrap_or_default(),
            definition_short: row.definition_short.unwrap_or_default(),
            definition_lit: row.definition_lit.unwrap_or_default(),
            definition_long: row.definition_long.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
            compare: row.compare.unwrap_or_default(),
            see_also: row.see_also.unwrap_or_default(),
        }
    }
}

/// Split a version filter into the two nullable query parameters
fn filter_params(filter: Option<&VersionFilter>) -> (Option<Uuid>, Option<String>) {
    match filter {
        Some(VersionFilter::Id(id)) => (Some(*id), None),
        Some(VersionFilter::Code(code)) => (None, Some(code.clone())),
        None => (None, None),
    }
}

// ============================================================================
// Repository
// ============================================================================

#[derive(Clone)]
pub struct PgBibleStore {
    pool: PgPool,
}

impl PgBibleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BibleStore for PgBibleStore {
    async fn versions(&self) -> StoreResult<Vec<BibleVersion>> {
        let rows = sqlx::query_as::<_, VersionRow>(
            r#"SELECT id, code, name, language, is_active
               FROM bible_versions
               WHERE is_active
               ORDER BY code"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BibleVersion::from).collect())
    }

    async fn version_by_code(&self, code: &str) -> StoreResult<Option<BibleVersion>> {
        let row = sqlx::query_as::<_, VersionRow>(
            r#"SELECT id, code, name, language, is_active
               FROM bible_versions
               WHERE lower(code) = lower($1)"#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BibleVersion::from))
    }

    async fn books(&self) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"SELECT id, name, testament, chapters_count, book_order
               FROM books
               ORDER BY book_order"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn book_by_name(&self, name: &str) -> StoreResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"SELECT id, name, testament, chapters_count, book_order
               FROM books
               WHERE lower(name) = lower($1)"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Book::try_from).transpose()
    }

    async fn chapter(&self, book_id: Uuid, chapter_number: i32) -> StoreResult<Option<Chapter>> {
        let row = sqlx::query_as::<_, ChapterRow>(
            r#"SELECT id, book_id, chapter_number, verses_count
               FROM chapters
               WHERE book_id = $1 AND chapter_number = $2"#,
        )
        .bind(book_id)
        .bind(chapter_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Chapter::from))
    }

    async fn chapter_verses(&self, chapter_id: Uuid, version_id: Uuid) -> StoreResult<Vec<Verse>> {
        let rows = sqlx::query_as::<_, VerseRow>(
            r#"SELECT id, verse_number, text, audio_url
               FROM verses
               WHERE chapter_id = $1 AND version_id = $2
               ORDER BY verse_number"#,
        )
        .bind(chapter_id)
        .bind(version_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Verse::from).collect())
    }

    async fn find_reference(&self, query: &ReferenceQuery) -> StoreResult<Vec<VerseHit>> {
        debug!(
            "Reference query {} {}-{} verses {:?}",
            query.book, query.chapter, query.chapter_end, query.verses
        );
        let (version_id, version_code) = filter_params(query.version.as_ref());
        let verses: Option<Vec<i32>> = query
            .verses
            .as_ref()
            .map(|verses| verses.iter().map(|v| *v as i32).collect());

        let rows = sqlx::query_as::<_, VerseHitRow>(verse_hit_query!(
            "FROM verses v",
            r#"WHERE lower(b.name) = lower($1)
                 AND c.chapter_number BETWEEN $2 AND $3
                 AND ($4::int4[] IS NULL OR v.verse_number = ANY($4))
                 AND ($5::uuid IS NULL OR bv.id = $5)
                 AND ($6::text IS NULL OR lower(bv.code) = lower($6))
               ORDER BY b.book_order, c.chapter_number, v.verse_number, bv.code"#
        ))
        .bind(&query.book)
        .bind(query.chapter as i32)
        .bind(query.chapter_end as i32)
        .bind(verses)
        .bind(version_id)
        .bind(version_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VerseHit::from).collect())
    }

    async fn search_text(
        &self,
        term: &str,
        version: Option<&VersionFilter>,
        limit: i64,
    ) -> StoreResult<Vec<VerseHit>> {
        let (version_id, version_code) = filter_params(version);
        let rows = sqlx::query_as::<_, VerseHitRow>(verse_hit_query!(
            "FROM verses v",
            r#"WHERE v.text_search @@ websearch_to_tsquery('simple', $1)
                 AND ($2::uuid IS NULL OR bv.id = $2)
                 AND ($3::text IS NULL OR lower(bv.code) = lower($3))
               ORDER BY b.book_order, c.chapter_number, v.verse_number
               LIMIT $4"#
        ))
        .bind(term)
        .bind(version_id)
        .bind(version_code)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VerseHit::from).collect())
    }

    async fn verse(&self, verse_id: Uuid) -> StoreResult<Option<VerseHit>> {
        let row = sqlx::query_as::<_, VerseHitRow>(verse_hit_query!(
            "FROM verses v",
            "WHERE v.id = $1"
        ))
        .bind(verse_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(VerseHit::from))
    }

    async fn verse_key(&self, verse_id: Uuid) -> StoreResult<Option<String>> {
        let osis = sqlx::query_scalar::<_, String>(
            r#"SELECT vk.osis
               FROM verses v
               JOIN verse_keys vk ON vk.id = v.verse_key_id
               WHERE v.id = $1"#,
        )
        .bind(verse_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(osis)
    }

    async fn verse_by_key(&self, osis: &str, version_code: &str) -> StoreResult<Option<VerseHit>> {
        let row = sqlx::query_as::<_, VerseHitRow>(verse_hit_query!(
            "FROM verses v JOIN verse_keys vk ON vk.id = v.verse_key_id",
            "WHERE vk.osis = $1 AND lower(bv.code) = lower($2)"
        ))
        .bind(osis)
        .bind(version_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(VerseHit::from))
    }

    async fn tagged_verse(
        &self,
        osis: &str,
        version_code: &str,
    ) -> StoreResult<Option<TaggedVerse>> {
        let row = sqlx::query_as::<_, TaggedVerseRow>(
            r#"SELECT osis, plain_text, tagged_text
               FROM get_kjv_verse_with_strongs($1, $2)"#,
        )
        .bind(osis)
        .bind(version_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(TaggedVerse::from))
    }

    async fn strongs_words(&self, verse_id: Uuid) -> StoreResult<Vec<StrongsWord>> {
        let rows = sqlx::query_as::<_, StrongsWordRow>(
            r#"SELECT verse_id, word_order, word_text, strongs_number
               FROM kjv_strongs_words
               WHERE verse_id = $1
               ORDER BY word_order"#,
        )
        .bind(verse_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StrongsWord::from).collect())
    }

    async fn verses_with_strongs(&self, number: &str) -> StoreResult<Vec<VerseHit>> {
        let rows = sqlx::query_as::<_, VerseHitRow>(verse_hit_query!(
            "FROM kjv_strongs_words w JOIN verses v ON v.id = w.verse_id",
            r#"WHERE w.strongs_number = $1
               ORDER BY b.book_order, c.chapter_number, v.verse_number, w.word_order"#
        ))
        .bind(number)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VerseHit::from).collect())
    }

    async fn lexicon_entry(&self, number: &str) -> StoreResult<Option<LexiconEntry>> {
        let row = sqlx::query_as::<_, LexiconRow>(
            r#"SELECT strongs_number, language, lemma, transliterations, pronunciations,
                      derivation, part_of_speech, definition_short, definition_lit,
                      definition_long, notes, compare, see_also
               FROM strongs_lexicon
               WHERE strongs_number = $1"#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(LexiconEntry::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_testament_is_a_decode_error() {
        let row = BookRow {
            id: Uuid::new_v4(),
            name: "John".to_string(),
            testament: "apocrypha".to_string(),
            chapters_count: 21,
            book_order: 43,
        };
        assert!(matches!(Book::try_from(row), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn missing_tagged_text_falls_back_to_plain() {
        let verse = TaggedVerse::from(TaggedVerseRow {
            osis: "John.3.16".to_string(),
            plain_text: Some("For God so loved".to_string()),
            tagged_text: None,
        });
        assert_eq!(verse.tagged_text, "For God so loved");
    }

    #[test]
    fn version_filter_binds_one_side() {
        let id = Uuid::new_v4();
        assert_eq!(filter_params(Some(&VersionFilter::Id(id))), (Some(id), None));
        assert_eq!(
            filter_params(Some(&VersionFilter::Code("KJV".to_string()))),
            (None, Some("KJV".to_string()))
        );
        assert_eq!(filter_params(None), (None, None));
    }

    #[test]
    fn verse_hit_query_joins_before_the_tail() {
        let sql = verse_hit_query!("FROM verses v", "WHERE v.id = $1");
        let joins = sql.find("JOIN chapters").unwrap();
        let tail = sql.find("WHERE v.id").unwrap();
        assert!(joins < tail);
    }
}
