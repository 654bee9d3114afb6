//! Search dispatcher against the sample dataset
//!
//! Run with: cargo test --test search_dispatch

use std::sync::Arc;

use bible_study::bible_types::SearchKind;
use bible_study::search::{SearchDispatcher, SEARCH_FAILED_NOTICE, STRONGS_SEARCH_FAILED_NOTICE};
use bible_study::store::sample::{sample_store, READING_VERSION, TAGGED_VERSION};
use bible_study::store::{BibleStore, InMemoryBibleStore, VersionFilter};

async fn setup() -> (Arc<InMemoryBibleStore>, SearchDispatcher) {
    let store = Arc::new(sample_store().await);
    let dispatcher = SearchDispatcher::new(store.clone());
    (store, dispatcher)
}

fn code(code: &str) -> Option<VersionFilter> {
    Some(VersionFilter::Code(code.to_string()))
}

// ============================================================================
// Reference search
// ============================================================================

#[tokio::test]
async fn verse_range_in_one_version() {
    let (_, dispatcher) = setup().await;
    let result = dispatcher.perform_search("1.Joh.1:2-5", code(READING_VERSION)).await;

    assert_eq!(result.kind, SearchKind::Reference);
    assert_eq!(result.notice, None);
    let reference = result.reference.unwrap();
    assert_eq!(reference.book, "I John");
    let verses: Vec<i32> = result.verses.iter().map(|v| v.verse_number).collect();
    assert_eq!(verses, vec![2, 3, 4, 5]);
    assert!(result
        .verses
        .iter()
        .all(|v| v.version_code.as_deref() == Some(READING_VERSION)));
}

#[tokio::test]
async fn reference_without_version_spans_all_versions() {
    let (_, dispatcher) = setup().await;
    let result = dispatcher.perform_search("Matt 5:14", None).await;
    assert_eq!(result.kind, SearchKind::Reference);
    let mut versions: Vec<&str> = result
        .verses
        .iter()
        .filter_map(|v| v.version_code.as_deref())
        .collect();
    versions.sort();
    assert_eq!(versions, vec![TAGGED_VERSION, READING_VERSION]);
}

#[tokio::test]
async fn whole_chapter_and_version_by_id() {
    let (store, dispatcher) = setup().await;
    let kr92 = store
        .version_by_code(READING_VERSION)
        .await
        .unwrap()
        .unwrap();

    let result = dispatcher
        .perform_search("1 Joh 1", Some(VersionFilter::Id(kr92.id)))
        .await;
    assert_eq!(result.verses.len(), 5);
    assert_eq!(result.verses[0].verse_number, 1);
}

#[tokio::test]
async fn unknown_book_is_still_a_reference_search() {
    let (_, dispatcher) = setup().await;
    let result = dispatcher.perform_search("Hezekiah 4:2", None).await;
    assert_eq!(result.kind, SearchKind::Reference);
    assert!(result.verses.is_empty());
    assert_eq!(result.notice, None);
}

// ============================================================================
// Text search
// ============================================================================

#[tokio::test]
async fn free_text_becomes_text_search() {
    let (_, dispatcher) = setup().await;
    let result = dispatcher.perform_search("light", None).await;
    assert_eq!(result.kind, SearchKind::Text);
    assert_eq!(result.reference, None);
    let found: Vec<(&str, i32, i32)> = result
        .verses
        .iter()
        .map(|v| (v.book_name.as_str(), v.chapter_number, v.verse_number))
        .collect();
    assert_eq!(found, vec![("Matthew", 5, 14), ("I John", 1, 5)]);
}

#[tokio::test]
async fn phrases_and_exclusions() {
    let (_, dispatcher) = setup().await;
    let phrase = dispatcher
        .perform_search(r#""so loved the world""#, None)
        .await;
    assert_eq!(phrase.verses.len(), 1);
    assert_eq!(phrase.verses[0].chapter_number, 3);

    let excluded = dispatcher.perform_search("world -loved", code(TAGGED_VERSION)).await;
    assert!(excluded.verses.iter().all(|v| !v.text.contains("loved")));
    assert!(excluded
        .verses
        .iter()
        .any(|v| v.book_name == "Matthew" && v.verse_number == 14));
}

#[tokio::test]
async fn text_search_respects_the_limit() {
    let store = Arc::new(sample_store().await);
    let dispatcher = SearchDispatcher::with_limit(store, 2);
    let result = dispatcher.perform_search("the", None).await;
    assert_eq!(result.verses.len(), 2);
}

#[tokio::test]
async fn backend_failure_becomes_a_notice() {
    let (store, dispatcher) = setup().await;
    store.set_offline(true);

    let reference = dispatcher.perform_search("John 3:16", None).await;
    assert_eq!(reference.kind, SearchKind::Reference);
    assert!(reference.verses.is_empty());
    assert_eq!(reference.notice.as_deref(), Some(SEARCH_FAILED_NOTICE));
    assert_eq!(reference.reference.unwrap().book, "John");

    let text = dispatcher.perform_search("light", None).await;
    assert_eq!(text.kind, SearchKind::Text);
    assert_eq!(text.notice.as_deref(), Some(SEARCH_FAILED_NOTICE));
}

// ============================================================================
// Strong's search
// ============================================================================

#[tokio::test]
async fn strongs_search_lists_each_verse_once() {
    let (_, dispatcher) = setup().await;
    let result = dispatcher.search_strongs("G0025").await;

    assert_eq!(result.search_term, "G25");
    assert_eq!(result.notice, None);
    // I John 4:7 tags G25 twice
    assert_eq!(result.total_count, 3);
    let places: Vec<(&str, i32, i32)> = result
        .verses
        .iter()
        .map(|v| (v.book_name.as_str(), v.chapter_number, v.verse_number))
        .collect();
    assert!(places.contains(&("Matthew", 22, 39)));
    assert!(places.contains(&("John", 3, 16)));
    assert!(places.contains(&("I John", 4, 7)));
}

#[tokio::test]
async fn strongs_search_failure_becomes_a_notice() {
    let (store, dispatcher) = setup().await;
    store.set_offline(true);
    let result = dispatcher.search_strongs("H85").await;
    assert_eq!(result.total_count, 0);
    assert_eq!(result.notice.as_deref(), Some(STRONGS_SEARCH_FAILED_NOTICE));
}
