//! User data repository: markings, reading history and profiles

use async_trait::async_trait;
use bible_types::{
    HistoryType, MarkingType, NewMarking, NewReadingEntry, Profile, ReadingHistoryEntry,
    UserMarking,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::AnnotationStore;

const HISTORY_COLUMNS: &str = r#"h.id, h.user_id, h.book_id, b.name AS book_name,
       h.chapter_number, h.verse_number, bv.code AS version_code,
       h.history_type, h.last_read_at"#;

#[derive(Debug, FromRow)]
struct MarkingRow {
    id: Uuid,
    user_id: Uuid,
    verse_id: Uuid,
    marking_type: String,
    color: Option<String>,
    content: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MarkingRow> for UserMarking {
    type Error = StoreError;

    fn try_from(row: MarkingRow) -> Result<Self, Self::Error> {
        let marking_type = MarkingType::parse(&row.marking_type).ok_or_else(|| {
            StoreError::decode(
                "user_markings",
                format!("unknown marking_type '{}'", row.marking_type),
            )
        })?;
        Ok(UserMarking {
            id: row.id,
            user_id: row.user_id,
            verse_id: row.verse_id,
            marking_type,
            color: row.color,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    book_name: String,
    chapter_number: i32,
    verse_number: Option<i32>,
    version_code: Option<String>,
    history_type: String,
    last_read_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for ReadingHistoryEntry {
    type Error = StoreError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let history_type = HistoryType::parse(&row.history_type).ok_or_else(|| {
            StoreError::decode(
                "user_reading_history",
                format!("unknown history_type '{}'", row.history_type),
            )
        })?;
        Ok(ReadingHistoryEntry {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            book_name: row.book_name,
            chapter_number: row.chapter_number,
            verse_number: row.verse_number,
            version_code: row.version_code,
            history_type,
            last_read_at: row.last_read_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    user_id: Uuid,
    display_name: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            display_name: row.display_name,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgAnnotationStore {
    pool: PgPool,
}

impl PgAnnotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnotationStore for PgAnnotationStore {
    async fn markings(
        &self,
        user_id: Uuid,
        kind: Option<MarkingType>,
    ) -> StoreResult<Vec<UserMarking>> {
        let rows = sqlx::query_as::<_, MarkingRow>(
            r#"SELECT id, user_id, verse_id, marking_type, color, content, created_at, updated_at
               FROM user_markings
               WHERE user_id = $1
                 AND ($2::text IS NULL OR marking_type = $2)
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(UserMarking::try_from).collect()
    }

    async fn find_marking(
        &self,
        user_id: Uuid,
        verse_id: Uuid,
        kind: MarkingType,
    ) -> StoreResult<Option<UserMarking>> {
        let row = sqlx::query_as::<_, MarkingRow>(
            r#"SELECT id, user_id, verse_id, marking_type, color, content, created_at, updated_at
               FROM user_markings
               WHERE user_id = $1 AND verse_id = $2 AND marking_type = $3
               ORDER BY created_at DESC
               LIMIT 1"#,
        )
        .bind(user_id)
        .bind(verse_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserMarking::try_from).transpose()
    }

    async fn count_markings(&self, user_id: Uuid, kind: MarkingType) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM user_markings
               WHERE user_id = $1 AND marking_type = $2"#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn add_marking(&self, user_id: Uuid, marking: &NewMarking) -> StoreResult<UserMarking> {
        let row = sqlx::query_as::<_, MarkingRow>(
            r#"INSERT INTO user_markings (user_id, verse_id, marking_type, color, content)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, user_id, verse_id, marking_type, color, content, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(marking.verse_id)
        .bind(marking.marking_type.as_str())
        .bind(&marking.color)
        .bind(&marking.content)
        .fetch_one(&self.pool)
        .await?;
        UserMarking::try_from(row)
    }

    async fn update_content(
        &self,
        user_id: Uuid,
        marking_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<UserMarking>> {
        let row = sqlx::query_as::<_, MarkingRow>(
            r#"UPDATE user_markings
               SET content = $3, updated_at = now()
               WHERE id = $2 AND user_id = $1
               RETURNING id, user_id, verse_id, marking_type, color, content, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(marking_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserMarking::try_from).transpose()
    }

    async fn delete_marking(&self, user_id: Uuid, marking_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(r#"DELETE FROM user_markings WHERE id = $2 AND user_id = $1"#)
            .bind(user_id)
            .bind(marking_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_reading(
        &self,
        user_id: Uuid,
        entry: &NewReadingEntry,
    ) -> StoreResult<ReadingHistoryEntry> {
        let sql = format!(
            r#"WITH h AS (
                   INSERT INTO user_reading_history
                       (user_id, book_id, chapter_number, verse_number, version_id, history_type)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING *
               )
               SELECT {HISTORY_COLUMNS}
               FROM h
               JOIN books b ON b.id = h.book_id
               LEFT JOIN bible_versions bv ON bv.id = h.version_id"#
        );
        let row = sqlx::query_as::<_, HistoryRow>(&sql)
            .bind(user_id)
            .bind(entry.book_id)
            .bind(entry.chapter_number)
            .bind(entry.verse_number)
            .bind(entry.version_id)
            .bind(entry.history_type.as_str())
            .fetch_one(&self.pool)
            .await?;
        ReadingHistoryEntry::try_from(row)
    }

    async fn reading_history(
        &self,
        user_id: Uuid,
        kind: Option<HistoryType>,
        limit: i64,
    ) -> StoreResult<Vec<ReadingHistoryEntry>> {
        let sql = format!(
            r#"SELECT {HISTORY_COLUMNS}
               FROM user_reading_history h
               JOIN books b ON b.id = h.book_id
               LEFT JOIN bible_versions bv ON bv.id = h.version_id
               WHERE h.user_id = $1
                 AND ($2::text IS NULL OR h.history_type = $2)
               ORDER BY h.last_read_at DESC
               LIMIT $3"#
        );
        let rows = sqlx::query_as::<_, HistoryRow>(&sql)
            .bind(user_id)
            .bind(kind.map(|k| k.as_str()))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(ReadingHistoryEntry::try_from).collect()
    }

    async fn profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"SELECT user_id, display_name, updated_at
               FROM profiles
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
    ) -> StoreResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"INSERT INTO profiles (user_id, display_name, updated_at)
               VALUES ($1, $2, now())
               ON CONFLICT (user_id) DO UPDATE
                   SET display_name = EXCLUDED.display_name, updated_at = now()
               RETURNING user_id, display_name, updated_at"#,
        )
        .bind(user_id)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(Profile::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_marking_type_is_a_decode_error() {
        let now = Utc::now();
        let row = MarkingRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            verse_id: Uuid::new_v4(),
            marking_type: "summary".to_string(),
            color: None,
            content: None,
            created_at: now,
            updated_at: now,
        };
        assert!(UserMarking::try_from(row).is_err());
    }

    #[test]
    fn history_row_converts() {
        let row = HistoryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            book_name: "John".to_string(),
            chapter_number: 3,
            verse_number: Some(16),
            version_code: Some("KR92".to_string()),
            history_type: "listen".to_string(),
            last_read_at: Utc::now(),
        };
        let entry = ReadingHistoryEntry::try_from(row).unwrap();
        assert_eq!(entry.history_type, HistoryType::Listen);
        assert_eq!(entry.label(), "John 3:16");
    }
}
