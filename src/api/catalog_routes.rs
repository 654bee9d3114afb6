//! Catalog endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/versions` - Active versions ordered by code
//! - `GET /api/books` - Books in canonical order
//! - `GET /api/books/:book/chapters/:chapter?version=KR92` - One chapter with its verses

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use bible_types::{BibleVersion, Book, ChapterWithVerses};
use serde::Deserialize;

use super::{api_error, ok, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    /// Version code; defaults to the configured reading version
    pub version: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/versions
async fn list_versions(State(state): State<AppState>) -> ApiResult<Vec<BibleVersion>> {
    ok(state.reader.versions().await?)
}

/// GET /api/books
async fn list_books(State(state): State<AppState>) -> ApiResult<Vec<Book>> {
    ok(state.reader.books().await?)
}

/// GET /api/books/:book/chapters/:chapter
///
/// `:book` accepts any spelling the normalizer knows (`1.Joh`, `Matt`,
/// `Johannes`).
async fn get_chapter(
    State(state): State<AppState>,
    Path((book, chapter)): Path<(String, u32)>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<ChapterWithVerses> {
    let version = query.version.as_deref().filter(|v| !v.trim().is_empty());
    match state.reader.chapter(&book, chapter, version).await? {
        Some(chapter) => ok(chapter),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!(
                "{} {} not found in {}",
                book,
                chapter,
                version.unwrap_or(state.reader.default_version())
            ),
        )),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/versions", get(list_versions))
        .route("/api/books", get(list_books))
        .route("/api/books/:book/chapters/:chapter", get(get_chapter))
}
