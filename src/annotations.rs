//! Per-user annotations: highlights, notes, comments, bookmarks, reading
//! history and the profile display name.

use std::sync::Arc;

use bible_types::{
    HistoryType, MarkingType, NewMarking, NewReadingEntry, Profile, ReadingHistoryEntry,
    UserMarking, UserSummary,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{BibleError, BibleResult};
use crate::store::AnnotationStore;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFFF00";

/// Palette offered by the reader: yellow, green, pink, blue
pub const HIGHLIGHT_COLORS: [&str; 4] = ["#FFFF00", "#90EE90", "#FFB6C1", "#87CEEB"];

/// State of a toggled marking after the call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    Added(UserMarking),
    Removed,
}

pub struct AnnotationService {
    store: Arc<dyn AnnotationStore>,
}

impl AnnotationService {
    pub fn new(store: Arc<dyn AnnotationStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Markings
    // ========================================================================

    /// Highlight a verse, or remove the highlight if it already has one
    pub async fn toggle_highlight(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        color: Option<&str>,
    ) -> BibleResult<Toggled> {
        let color = normalize_color(color.unwrap_or(DEFAULT_HIGHLIGHT_COLOR))?;
        self.toggle(user_id, verse_id, MarkingType::Highlight, Some(color))
            .await
    }

    /// Bookmark a verse, or remove the bookmark if it already has one
    pub async fn toggle_bookmark(&self, user_id: Uuid, verse_id: Uuid) -> BibleResult<Toggled> {
        self.toggle(user_id, verse_id, MarkingType::Bookmark, None).await
    }

    async fn toggle(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        kind: MarkingType,
        color: Option<String>,
    ) -> BibleResult<Toggled> {
        if let Some(existing) = self.store.find_marking(user_id, verse_id, kind).await? {
            debug!("Removing {} {} for {}", kind.as_str(), existing.id, user_id);
            self.store.delete_marking(user_id, existing.id).await?;
            return Ok(Toggled::Removed);
        }

        let marking = NewMarking {
            verse_id,
            marking_type: kind,
            color,
            content: None,
        };
        Ok(Toggled::Added(self.store.add_marking(user_id, &marking).await?))
    }

    pub async fn add_note(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        content: &str,
    ) -> BibleResult<UserMarking> {
        self.add_text(user_id, verse_id, MarkingType::Note, content).await
    }

    pub async fn add_comment(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        content: &str,
    ) -> BibleResult<UserMarking> {
        self.add_text(user_id, verse_id, MarkingType::Comment, content)
            .await
    }

    async fn add_text(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        kind: MarkingType,
        content: &str,
    ) -> BibleResult<UserMarking> {
        let content = non_empty(content, kind)?;
        let marking = NewMarking {
            verse_id,
            marking_type: kind,
            color: None,
            content: Some(content),
        };
        Ok(self.store.add_marking(user_id, &marking).await?)
    }

    /// Create a marking of any kind from a request body
    pub async fn add_marking(
        &self,
        user_id: Uuid,
        marking: NewMarking,
    ) -> BibleResult<UserMarking> {
        match marking.marking_type {
            MarkingType::Note | MarkingType::Comment => {
                let content = marking.content.as_deref().unwrap_or_default();
                self.add_text(user_id, marking.verse_id, marking.marking_type, content)
                    .await
            }
            MarkingType::Highlight => {
                let color = normalize_color(
                    marking.color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR),
                )?;
                let marking = NewMarking {
                    color: Some(color),
                    ..marking
                };
                Ok(self.store.add_marking(user_id, &marking).await?)
            }
            MarkingType::Bookmark => Ok(self.store.add_marking(user_id, &marking).await?),
        }
    }

    pub async fn update_content(
        &self,
        user_id: Uuid,
        marking_id: Uuid,
        content: &str,
    ) -> BibleResult<UserMarking> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BibleError::InvalidInput("content must not be empty".to_string()));
        }
        self.store
            .update_content(user_id, marking_id, content)
            .await?
            .ok_or_else(|| BibleError::not_found(format!("Marking {}", marking_id)))
    }

    /// Delete a marking owned by `user_id`
    pub async fn delete_marking(&self, user_id: Uuid, marking_id: Uuid) -> BibleResult<()> {
        if self.store.delete_marking(user_id, marking_id).await? {
            Ok(())
        } else {
            Err(BibleError::not_found(format!("Marking {}", marking_id)))
        }
    }

    /// Markings newest first, optionally of one kind
    pub async fn markings(
        &self,
        user_id: Uuid,
        kind: Option<MarkingType>,
    ) -> BibleResult<Vec<UserMarking>> {
        Ok(self.store.markings(user_id, kind).await?)
    }

    // ========================================================================
    // Reading history
    // ========================================================================

    pub async fn record_reading(
        &self,
        user_id: Uuid,
        entry: NewReadingEntry,
    ) -> BibleResult<ReadingHistoryEntry> {
        if entry.chapter_number < 1 || entry.verse_number.is_some_and(|v| v < 1) {
            return Err(BibleError::InvalidInput(
                "chapter and verse numbers start at 1".to_string(),
            ));
        }
        Ok(self.store.record_reading(user_id, &entry).await?)
    }

    /// Most recent entries first; `limit` defaults to 50
    pub async fn history(
        &self,
        user_id: Uuid,
        kind: Option<HistoryType>,
        limit: Option<i64>,
    ) -> BibleResult<Vec<ReadingHistoryEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
        Ok(self.store.reading_history(user_id, kind, limit).await?)
    }

    /// Where the user last read (or listened)
    pub async fn last_position(
        &self,
        user_id: Uuid,
        kind: HistoryType,
    ) -> BibleResult<Option<ReadingHistoryEntry>> {
        Ok(self
            .store
            .reading_history(user_id, Some(kind), 1)
            .await?
            .into_iter()
            .next())
    }

    /// Counters and last positions for the sidebar
    pub async fn summary(&self, user_id: Uuid) -> BibleResult<UserSummary> {
        Ok(UserSummary {
            highlights_count: self
                .store
                .count_markings(user_id, MarkingType::Highlight)
                .await?,
            comments_count: self
                .store
                .count_markings(user_id, MarkingType::Comment)
                .await?,
            bookmarks_count: self
                .store
                .count_markings(user_id, MarkingType::Bookmark)
                .await?,
            last_read: self.last_position(user_id, HistoryType::Read).await?,
            last_listened: self.last_position(user_id, HistoryType::Listen).await?,
        })
    }

    // ========================================================================
    // Profile
    // ========================================================================

    pub async fn profile(&self, user_id: Uuid) -> BibleResult<Option<Profile>> {
        Ok(self.store.profile(user_id).await?)
    }

    /// Set or clear the display name; blank names clear it
    pub async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
    ) -> BibleResult<Profile> {
        let display_name = display_name.map(str::trim).filter(|name| !name.is_empty());
        Ok(self.store.update_display_name(user_id, display_name).await?)
    }
}

/// Accept `#RRGGBB` in any case; stored uppercase
fn normalize_color(color: &str) -> BibleResult<String> {
    let color = color.trim();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].bytes().all(|b| b.is_ascii_hexdigit());
    if !valid {
        return Err(BibleError::InvalidInput(format!(
            "highlight color '{}' is not #RRGGBB",
            color
        )));
    }
    Ok(color.to_ascii_uppercase())
}

fn non_empty(content: &str, kind: MarkingType) -> BibleResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(BibleError::InvalidInput(format!(
            "a {} needs some text",
            kind.as_str()
        )));
    }
    Ok(content.to_string())
}
