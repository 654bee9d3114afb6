//! Word-study endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/strongs/:number` - Lexicon card with resolved cross-references
//! - `GET /api/spans?text=love<G25> thy<G4675>` - Parse tagged text into spans
//! - `GET /api/study/:book/:chapter/:verse?version=KR92` - Verse beside its tagged text
//! - `GET /api/verses/:verse_id/map?version=KJV` - Same verse in another version

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use bible_types::{LexiconCard, TextSpan, VerseHit, VerseStudy};
use serde::Deserialize;
use uuid::Uuid;

use super::catalog_routes::VersionQuery;
use super::{api_error, ok, ApiResult, AppState};
use crate::strongs::parse_tagged_text;

#[derive(Debug, Deserialize)]
pub struct SpansQuery {
    #[serde(default)]
    pub text: String,
}

/// GET /api/strongs/:number
///
/// Always 200: unknown numbers produce a card without an entry.
async fn lexicon_card(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<LexiconCard> {
    ok(state.strongs.lexicon_card(&number).await)
}

/// GET /api/spans
async fn spans(Query(query): Query<SpansQuery>) -> ApiResult<Vec<TextSpan>> {
    ok(parse_tagged_text(&query.text))
}

/// GET /api/study/:book/:chapter/:verse
async fn study_verse(
    State(state): State<AppState>,
    Path((book, chapter, verse)): Path<(String, u32, u32)>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<VerseStudy> {
    let version = query.version.as_deref().filter(|v| !v.trim().is_empty());
    ok(state
        .strongs
        .study_verse(&book, chapter, verse, version)
        .await?)
}

/// GET /api/verses/:verse_id/map
///
/// `version` defaults to the Strong's version.
async fn map_verse(
    State(state): State<AppState>,
    Path(verse_id): Path<Uuid>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<VerseHit> {
    let target = query
        .version
        .unwrap_or_else(|| state.strongs.strongs_version().to_string());
    match state.strongs.map_verse(verse_id, &target).await? {
        Some(hit) => ok(hit),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No {} verse shares the key of {}", target, verse_id),
        )),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/strongs/:number", get(lexicon_card))
        .route("/api/spans", get(spans))
        .route("/api/study/:book/:chapter/:verse", get(study_verse))
        .route("/api/verses/:verse_id/map", get(map_verse))
}
