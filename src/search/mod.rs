//! Search dispatcher
//!
//! A query that parses as a scripture reference becomes one lookup scoped to
//! book, chapter span, verses and version; anything else becomes a capped
//! full-text search. Backend failures come back as an empty result carrying a
//! user-visible notice. Nothing is retried.

use std::collections::HashSet;
use std::sync::Arc;

use bible_types::{SearchKind, SearchResult, StrongsSearchResult};
use tracing::{debug, warn};

use crate::config::DEFAULT_TEXT_SEARCH_LIMIT;
use crate::reference::parse_bible_reference;
use crate::store::{BibleStore, ReferenceQuery, VersionFilter};
use crate::strongs::StrongsNumber;

pub const SEARCH_FAILED_NOTICE: &str = "Search failed, please try again";
pub const STRONGS_SEARCH_FAILED_NOTICE: &str = "Strong's search failed, please try again";

pub struct SearchDispatcher {
    store: Arc<dyn BibleStore>,
    text_limit: i64,
}

impl SearchDispatcher {
    pub fn new(store: Arc<dyn BibleStore>) -> Self {
        Self::with_limit(store, DEFAULT_TEXT_SEARCH_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn BibleStore>, text_limit: i64) -> Self {
        Self { store, text_limit }
    }

    /// Classify `query` and run exactly one backend search for it
    pub async fn perform_search(
        &self,
        query: &str,
        version: Option<VersionFilter>,
    ) -> SearchResult {
        let query = query.trim();
        if query.is_empty() {
            return SearchResult::empty(SearchKind::Text);
        }

        if let Some(reference) = parse_bible_reference(query) {
            debug!("Reference search for {}", reference);
            let lookup = ReferenceQuery::new(&reference, version);
            return match self.store.find_reference(&lookup).await {
                Ok(verses) => SearchResult {
                    kind: SearchKind::Reference,
                    verses,
                    reference: Some(reference),
                    notice: None,
                },
                Err(e) => {
                    warn!("Reference search for '{}' failed: {}", query, e);
                    SearchResult {
                        reference: Some(reference),
                        notice: Some(SEARCH_FAILED_NOTICE.to_string()),
                        ..SearchResult::empty(SearchKind::Reference)
                    }
                }
            };
        }

        debug!("Text search for '{}' (limit {})", query, self.text_limit);
        match self
            .store
            .search_text(query, version.as_ref(), self.text_limit)
            .await
        {
            Ok(verses) => SearchResult {
                verses,
                ..SearchResult::empty(SearchKind::Text)
            },
            Err(e) => {
                warn!("Text search for '{}' failed: {}", query, e);
                SearchResult {
                    notice: Some(SEARCH_FAILED_NOTICE.to_string()),
                    ..SearchResult::empty(SearchKind::Text)
                }
            }
        }
    }

    /// Verses containing a word tagged with `raw`, each verse once, in
    /// first-seen order
    pub async fn search_strongs(&self, raw: &str) -> StrongsSearchResult {
        let number = match raw.parse::<StrongsNumber>() {
            Ok(number) => number.to_string(),
            Err(e) => {
                debug!("Rejected Strong's search: {}", e);
                return StrongsSearchResult {
                    verses: Vec::new(),
                    total_count: 0,
                    search_term: raw.trim().to_string(),
                    notice: Some(e.to_string()),
                };
            }
        };

        match self.store.verses_with_strongs(&number).await {
            Ok(hits) => {
                let mut seen = HashSet::new();
                let verses: Vec<_> = hits.into_iter().filter(|hit| seen.insert(hit.id)).collect();
                StrongsSearchResult {
                    total_count: verses.len(),
                    verses,
                    search_term: number,
                    notice: None,
                }
            }
            Err(e) => {
                warn!("Strong's search for {} failed: {}", number, e);
                StrongsSearchResult {
                    verses: Vec::new(),
                    total_count: 0,
                    search_term: number,
                    notice: Some(STRONGS_SEARCH_FAILED_NOTICE.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample::sample_store;

    #[tokio::test]
    async fn empty_query_is_an_empty_text_result() {
        let store = Arc::new(sample_store().await);
        store.set_offline(true);
        let dispatcher = SearchDispatcher::new(store);
        // No backend call: an offline store would otherwise add a notice.
        let result = dispatcher.perform_search("   ", None).await;
        assert_eq!(result, SearchResult::empty(SearchKind::Text));
    }

    #[tokio::test]
    async fn invalid_strongs_number_is_rejected_without_lookup() {
        let dispatcher = SearchDispatcher::new(Arc::new(sample_store().await));
        let result = dispatcher.search_strongs("25").await;
        assert!(result.verses.is_empty());
        assert!(result.notice.is_some());
    }
}
