//! Search endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/search?q=1.Joh.1:2-5&version=KR92` - Reference or full-text search
//! - `GET /api/strongs/:number/verses` - Verses containing a tagged word
//!
//! Backend failures are reported inside the result (`notice`), not as HTTP
//! errors, so the client always gets a renderable result.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use bible_types::{SearchResult, StrongsSearchResult};
use serde::Deserialize;

use super::{ok, ApiResult, AppState};
use crate::store::VersionFilter;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Version id or code; all versions when absent
    pub version: Option<String>,
}

/// GET /api/search
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResult> {
    let version = query.version.as_deref().and_then(VersionFilter::parse);
    ok(state.search.perform_search(&query.q, version).await)
}

/// GET /api/strongs/:number/verses
async fn strongs_verses(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<StrongsSearchResult> {
    ok(state.search.search_strongs(&number).await)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/strongs/:number/verses", get(strongs_verses))
}
