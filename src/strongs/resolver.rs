//! Strong's resolver
//!
//! Joins the reading version to the tagged version through OSIS verse keys
//! and turns lexicon rows into renderable cards. Backend failures never
//! escape as errors from the card and study paths: a missing lemma shows
//! the raw identifier, a missing tagged verse shows no spans.

use std::collections::HashMap;
use std::sync::Arc;

use bible_types::{
    LexiconCard, LexiconEntry, LexiconSegment, TagLink, TaggedVerse, VerseHit, VerseStudy,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::history::NavigationHistory;
use super::lexicon_text::{first_identifier, split_cross_references, RawSegment};
use super::tags::{normalize_strongs, parse_tagged_text, StrongsNumber};
use crate::error::BibleResult;
use crate::reference::{book_info, normalize_book_name, VerseKey};
use crate::store::{BibleStore, ReferenceQuery, VersionFilter};

pub struct StrongsResolver {
    store: Arc<dyn BibleStore>,
    reading_version: String,
    strongs_version: String,
}

impl StrongsResolver {
    pub fn new(
        store: Arc<dyn BibleStore>,
        reading_version: impl Into<String>,
        strongs_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            reading_version: reading_version.into(),
            strongs_version: strongs_version.into(),
        }
    }

    pub fn strongs_version(&self) -> &str {
        &self.strongs_version
    }

    /// Look up one entry by its canonical number
    pub async fn lexicon_entry(&self, raw: &str) -> BibleResult<Option<LexiconEntry>> {
        let number: StrongsNumber = raw.parse()?;
        debug!("Lexicon lookup for {}", number);
        Ok(self.store.lexicon_entry(&number.to_string()).await?)
    }

    /// Build the card for the first identifier of `raw` (`"H85, H87"` opens H85).
    ///
    /// Never fails: an invalid or unknown identifier yields a card without an
    /// entry whose title shows the identifier as given.
    pub async fn lexicon_card(&self, raw: &str) -> LexiconCard {
        let first = first_identifier(raw).unwrap_or(raw.trim());
        let Some(number) = normalize_strongs(first) else {
            return missing_card(first, first);
        };

        let entry = match self.store.lexicon_entry(&number).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Lexicon lookup for {} failed: {}", number, e);
                None
            }
        };
        let Some(entry) = entry else {
            return missing_card(&number, first);
        };

        let mut links = LinkCache::default();
        let derivation = self.segments(&entry.derivation, &mut links).await;
        let notes = self.segments(&entry.notes, &mut links).await;
        let compare = self.link_list(&entry.compare, &mut links).await;
        let see_also = self.link_list(&entry.see_also, &mut links).await;

        LexiconCard {
            title: card_title(&number, &entry),
            pronunciation: pronunciation_line(&entry),
            strongs_number: number,
            derivation,
            notes,
            compare,
            see_also,
            entry: Some(entry),
        }
    }

    async fn segments(&self, text: &str, links: &mut LinkCache) -> Vec<LexiconSegment> {
        let mut segments = Vec::new();
        for raw in split_cross_references(text) {
            match raw {
                RawSegment::Text(text) => segments.push(LexiconSegment::Text {
                    text: text.to_string(),
                }),
                RawSegment::Reference(id) => segments.push(LexiconSegment::Link {
                    link: self.resolve_link(id, links).await,
                }),
            }
        }
        segments
    }

    async fn link_list(&self, ids: &[String], links: &mut LinkCache) -> Vec<TagLink> {
        let mut resolved = Vec::new();
        for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            resolved.push(self.resolve_link(id, links).await);
        }
        resolved
    }

    /// Resolve an identifier to its lemma, once per card
    async fn resolve_link(&self, raw: &str, links: &mut LinkCache) -> TagLink {
        if let Some(link) = links.get(raw) {
            return link.clone();
        }

        let link = match normalize_strongs(raw) {
            None => unresolved_link(raw, raw),
            Some(number) => match self.store.lexicon_entry(&number).await {
                Ok(Some(entry)) if !entry.lemma.is_empty() => TagLink {
                    strongs_number: number,
                    display: entry.lemma,
                    resolved: true,
                },
                Ok(_) => unresolved_link(&number, raw),
                Err(e) => {
                    warn!("Could not resolve cross-reference {}: {}", raw, e);
                    unresolved_link(&number, raw)
                }
            },
        };

        links.insert(raw.to_string(), link.clone());
        link
    }

    /// Tagged text of one verse of the Strong's version.
    ///
    /// Asks the backend function first; when it fails or has no row, reads
    /// the verse by key and composes `word<TAG>` text from its ordered words,
    /// falling back to the plain text when the verse has no words.
    pub async fn tagged_verse(&self, key: &VerseKey) -> BibleResult<Option<TaggedVerse>> {
        let osis = key.osis();
        match self.store.tagged_verse(&osis, &self.strongs_version).await {
            Ok(Some(row)) => return Ok(Some(row)),
            Ok(None) => debug!("No tagged-verse row for {}, composing from words", osis),
            Err(e) => warn!("Tagged-verse function failed for {}: {}", osis, e),
        }

        let Some(verse) = self
            .store
            .verse_by_key(&osis, &self.strongs_version)
            .await?
        else {
            return Ok(None);
        };

        let words = self.store.strongs_words(verse.id).await?;
        let tagged_text = if words.is_empty() {
            verse.text.clone()
        } else {
            words
                .iter()
                .map(|word| match &word.strongs_number {
                    Some(number) => format!("{}<{}>", word.word_text, number),
                    None => word.word_text.clone(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        Ok(Some(TaggedVerse {
            osis,
            plain_text: verse.text,
            tagged_text,
        }))
    }

    /// Open a verse for word study: the verse in the reading version beside
    /// the tagged verse sharing its stored key.
    ///
    /// The numbers address the verse inside the reading version only. The
    /// tagged verse is found through that verse's OSIS key, so a verse the
    /// versions number differently (KR92 Mal 3:19, KJV Mal 4:1) still pairs.
    pub async fn study_verse(
        &self,
        book: &str,
        chapter: u32,
        verse: u32,
        version: Option<&str>,
    ) -> BibleResult<VerseStudy> {
        let book = normalize_book_name(book);
        let numbered = VerseKey::checked(book.clone(), chapter, verse)?;
        let version = version.unwrap_or(&self.reading_version);

        let source = match self.numbered_verse(&numbered, version).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not load {} in {}: {}", numbered, version, e);
                None
            }
        };

        let key = match &source {
            Some(source) => self.stored_key(source.id).await,
            None => None,
        };
        let tagged = match &key {
            Some(key) => match self.tagged_verse(key).await {
                Ok(tagged) => tagged,
                Err(e) => {
                    warn!("Could not load tagged verse {}: {}", key, e);
                    None
                }
            },
            None => None,
        };
        let spans = tagged
            .as_ref()
            .map(|t| parse_tagged_text(&t.tagged_text))
            .unwrap_or_default();

        Ok(VerseStudy {
            osis: key.unwrap_or(numbered).osis(),
            display_name: book_info(&book).map(|info| info.finnish.to_string()),
            book,
            chapter,
            verse,
            source,
            tagged,
            spans,
        })
    }

    /// The verse numbered `key` inside `version_code`
    async fn numbered_verse(
        &self,
        key: &VerseKey,
        version_code: &str,
    ) -> BibleResult<Option<VerseHit>> {
        let query = ReferenceQuery {
            book: key.book.clone(),
            chapter: key.chapter,
            chapter_end: key.chapter,
            verses: Some(vec![key.verse]),
            version: Some(VersionFilter::Code(version_code.to_string())),
        };
        Ok(self.store.find_reference(&query).await?.into_iter().next())
    }

    async fn stored_key(&self, verse_id: Uuid) -> Option<VerseKey> {
        match self.store.verse_key(verse_id).await {
            Ok(Some(osis)) => match osis.parse() {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Verse {} has a malformed key: {}", verse_id, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Verse {} has no OSIS key", verse_id);
                None
            }
            Err(e) => {
                warn!("Could not read the key of verse {}: {}", verse_id, e);
                None
            }
        }
    }

    /// The verse of `target_version` sharing the OSIS key of `verse_id`.
    ///
    /// Chapter and verse numbers are never compared; versions that number a
    /// verse differently still map through the key.
    pub async fn map_verse(
        &self,
        verse_id: Uuid,
        target_version: &str,
    ) -> BibleResult<Option<VerseHit>> {
        let Some(osis) = self.store.verse_key(verse_id).await? else {
            debug!("Verse {} has no OSIS key", verse_id);
            return Ok(None);
        };
        Ok(self.store.verse_by_key(&osis, target_version).await?)
    }
}

type LinkCache = HashMap<String, TagLink>;

/// Card for an identifier with no lexicon row; the title keeps `raw` as written
fn missing_card(number: &str, raw: &str) -> LexiconCard {
    LexiconCard {
        strongs_number: number.to_string(),
        entry: None,
        title: format!("Strong's {}", raw),
        pronunciation: None,
        derivation: Vec::new(),
        notes: Vec::new(),
        compare: Vec::new(),
        see_also: Vec::new(),
    }
}

fn unresolved_link(number: &str, raw: &str) -> TagLink {
    TagLink {
        strongs_number: number.to_string(),
        display: raw.to_string(),
        resolved: false,
    }
}

/// `Strong's G25: ἀγαπάω, agapáō`
fn card_title(number: &str, entry: &LexiconEntry) -> String {
    let mut title = format!("Strong's {}", number);
    if !entry.lemma.is_empty() {
        title.push_str(": ");
        title.push_str(&entry.lemma);
    }
    if let Some(translit) = entry.transliterations.first().filter(|t| !t.is_empty()) {
        title.push_str(", ");
        title.push_str(translit);
    }
    title
}

/// `(ag-ap-ah'-o)`; several pronunciations are separated by ` | `
fn pronunciation_line(entry: &LexiconEntry) -> Option<String> {
    let pronunciations: Vec<&str> = entry
        .pronunciations
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    (!pronunciations.is_empty()).then(|| format!("({})", pronunciations.join(" | ")))
}

/// Back/forward navigation between lexicon cards
pub struct LexiconNavigator {
    resolver: Arc<StrongsResolver>,
    history: NavigationHistory<String>,
}

impl LexiconNavigator {
    pub fn new(resolver: Arc<StrongsResolver>) -> Self {
        Self {
            resolver,
            history: NavigationHistory::default(),
        }
    }

    /// Open a card and make it the newest history entry
    pub async fn open(&mut self, raw: &str) -> LexiconCard {
        let card = self.resolver.lexicon_card(raw).await;
        if self.history.current() != Some(&card.strongs_number) {
            self.history.push(card.strongs_number.clone());
        }
        card
    }

    pub async fn back(&mut self) -> Option<LexiconCard> {
        let number = self.history.back()?.clone();
        Some(self.resolver.lexicon_card(&number).await)
    }

    pub async fn forward(&mut self) -> Option<LexiconCard> {
        let number = self.history.forward()?.clone();
        Some(self.resolver.lexicon_card(&number).await)
    }

    pub fn current(&self) -> Option<&str> {
        self.history.current().map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(lemma: &str) -> LexiconEntry {
        LexiconEntry {
            strongs_number: "G25".to_string(),
            lemma: lemma.to_string(),
            transliterations: vec!["agapáō".to_string()],
            pronunciations: vec!["ag-ap-ah'-o".to_string(), "a-ga-pa-o".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn title_and_pronunciation_lines() {
        let entry = entry("ἀγαπάω");
        assert_eq!(card_title("G25", &entry), "Strong's G25: ἀγαπάω, agapáō");
        assert_eq!(
            pronunciation_line(&entry).as_deref(),
            Some("(ag-ap-ah'-o | a-ga-pa-o)")
        );
        assert_eq!(pronunciation_line(&LexiconEntry::default()), None);
    }

    #[test]
    fn missing_card_keeps_identifier() {
        let card = missing_card("H99999", "H099999");
        assert_eq!(card.strongs_number, "H99999");
        assert_eq!(card.title, "Strong's H099999");
        assert!(card.entry.is_none());
    }
}
