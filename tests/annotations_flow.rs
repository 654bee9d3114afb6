//! Annotation service over the in-memory store
//!
//! Run with: cargo test --test annotations_flow

use std::sync::Arc;

use bible_study::annotations::{AnnotationService, Toggled, DEFAULT_HIGHLIGHT_COLOR};
use bible_study::bible_types::{HistoryType, MarkingType, NewMarking, NewReadingEntry};
use bible_study::store::sample::{sample_store, READING_VERSION};
use bible_study::store::{BibleStore, InMemoryBibleStore};
use bible_study::BibleError;
use uuid::Uuid;

struct Fixture {
    store: Arc<InMemoryBibleStore>,
    service: AnnotationService,
    user: Uuid,
}

async fn setup() -> Fixture {
    let store = Arc::new(sample_store().await);
    let service = AnnotationService::new(store.clone());
    Fixture {
        store,
        service,
        user: Uuid::new_v4(),
    }
}

async fn verse_id(store: &InMemoryBibleStore, osis: &str) -> Uuid {
    store
        .verse_by_key(osis, READING_VERSION)
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn reading(
    store: &InMemoryBibleStore,
    book: &str,
    chapter: i32,
    kind: HistoryType,
) -> NewReadingEntry {
    let book = store.book_by_name(book).await.unwrap().unwrap();
    let version = store.version_by_code(READING_VERSION).await.unwrap().unwrap();
    NewReadingEntry {
        book_id: book.id,
        chapter_number: chapter,
        verse_number: None,
        version_id: Some(version.id),
        history_type: kind,
    }
}

// ============================================================================
// Markings
// ============================================================================

#[tokio::test]
async fn highlight_toggles_on_and_off() {
    let f = setup().await;
    let verse = verse_id(&f.store, "John.3.16").await;

    let Toggled::Added(marking) = f.service.toggle_highlight(f.user, verse, None).await.unwrap()
    else {
        panic!("first toggle should add");
    };
    assert_eq!(marking.color.as_deref(), Some(DEFAULT_HIGHLIGHT_COLOR));
    assert_eq!(marking.marking_type, MarkingType::Highlight);

    let removed = f.service.toggle_highlight(f.user, verse, None).await.unwrap();
    assert_eq!(removed, Toggled::Removed);
    assert!(f.service.markings(f.user, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn highlight_colors_are_validated() {
    let f = setup().await;
    let verse = verse_id(&f.store, "John.3.16").await;

    let Toggled::Added(marking) = f
        .service
        .toggle_highlight(f.user, verse, Some("#90ee90"))
        .await
        .unwrap()
    else {
        panic!("expected a new highlight");
    };
    assert_eq!(marking.color.as_deref(), Some("#90EE90"));

    let other = verse_id(&f.store, "John.3.17").await;
    let err = f
        .service
        .toggle_highlight(f.user, other, Some("green"))
        .await
        .unwrap_err();
    assert!(matches!(err, BibleError::InvalidInput(_)));
}

#[tokio::test]
async fn notes_can_be_edited_and_deleted_by_their_owner() {
    let f = setup().await;
    let verse = verse_id(&f.store, "I John.4.7").await;

    let note = f.service.add_note(f.user, verse, "  rakkaus  ").await.unwrap();
    assert_eq!(note.content.as_deref(), Some("rakkaus"));
    assert!(f.service.add_note(f.user, verse, "   ").await.is_err());

    let edited = f
        .service
        .update_content(f.user, note.id, "rakkaus on Jumalasta")
        .await
        .unwrap();
    assert_eq!(edited.content.as_deref(), Some("rakkaus on Jumalasta"));

    let stranger = Uuid::new_v4();
    let err = f.service.delete_marking(stranger, note.id).await.unwrap_err();
    assert!(matches!(err, BibleError::NotFound { .. }));

    f.service.delete_marking(f.user, note.id).await.unwrap();
    assert!(f.service.delete_marking(f.user, note.id).await.is_err());
}

#[tokio::test]
async fn markings_filter_by_kind() {
    let f = setup().await;
    let verse = verse_id(&f.store, "Matthew.5.14").await;

    f.service.toggle_bookmark(f.user, verse).await.unwrap();
    f.service
        .add_comment(f.user, verse, "Valo maailmalle")
        .await
        .unwrap();
    f.service
        .add_marking(
            f.user,
            NewMarking {
                verse_id: verse,
                marking_type: MarkingType::Highlight,
                color: None,
                content: None,
            },
        )
        .await
        .unwrap();

    let all = f.service.markings(f.user, None).await.unwrap();
    assert_eq!(all.len(), 3);
    let comments = f
        .service
        .markings(f.user, Some(MarkingType::Comment))
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content.as_deref(), Some("Valo maailmalle"));
}

// ============================================================================
// History and summary
// ============================================================================

#[tokio::test]
async fn history_is_newest_first_and_split_by_kind() {
    let f = setup().await;
    for (book, chapter, kind) in [
        ("Genesis", 1, HistoryType::Read),
        ("John", 3, HistoryType::Read),
        ("Matthew", 5, HistoryType::Listen),
    ] {
        let entry = reading(&f.store, book, chapter, kind).await;
        f.service.record_reading(f.user, entry).await.unwrap();
    }

    let all = f.service.history(f.user, None, None).await.unwrap();
    let labels: Vec<String> = all.iter().map(|h| h.label()).collect();
    assert_eq!(labels, vec!["Matthew 5", "John 3", "Genesis 1"]);
    assert_eq!(all[0].version_code.as_deref(), Some(READING_VERSION));

    let reads = f
        .service
        .history(f.user, Some(HistoryType::Read), Some(1))
        .await
        .unwrap();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].label(), "John 3");

    let last = f
        .service
        .last_position(f.user, HistoryType::Listen)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.book_name, "Matthew");
}

#[tokio::test]
async fn chapter_zero_is_not_recorded() {
    let f = setup().await;
    let entry = reading(&f.store, "John", 0, HistoryType::Read).await;
    assert!(f.service.record_reading(f.user, entry).await.is_err());
    assert!(f.service.history(f.user, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn summary_counts_markings_and_last_positions() {
    let f = setup().await;
    let first = verse_id(&f.store, "John.3.16").await;
    let second = verse_id(&f.store, "John.3.17").await;

    f.service.toggle_highlight(f.user, first, None).await.unwrap();
    f.service.toggle_highlight(f.user, second, None).await.unwrap();
    f.service.toggle_bookmark(f.user, first).await.unwrap();
    f.service
        .add_comment(f.user, first, "Evankeliumi pähkinänkuoressa")
        .await
        .unwrap();
    let entry = reading(&f.store, "John", 3, HistoryType::Read).await;
    f.service.record_reading(f.user, entry).await.unwrap();

    let summary = f.service.summary(f.user).await.unwrap();
    assert_eq!(summary.highlights_count, 2);
    assert_eq!(summary.bookmarks_count, 1);
    assert_eq!(summary.comments_count, 1);
    assert_eq!(summary.last_read.unwrap().label(), "John 3");
    assert!(summary.last_listened.is_none());

    // Other users see nothing
    let empty = f.service.summary(Uuid::new_v4()).await.unwrap();
    assert_eq!(empty.highlights_count, 0);
    assert!(empty.last_read.is_none());
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn display_name_is_trimmed_and_blank_clears_it() {
    let f = setup().await;
    assert!(f.service.profile(f.user).await.unwrap().is_none());

    let profile = f
        .service
        .update_display_name(f.user, Some("  Maria  "))
        .await
        .unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Maria"));

    let cleared = f.service.update_display_name(f.user, Some("  ")).await.unwrap();
    assert_eq!(cleared.display_name, None);
    assert_eq!(
        f.service.profile(f.user).await.unwrap().unwrap().display_name,
        None
    );
}
