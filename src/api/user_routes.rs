//! Per-user endpoints
//!
//! ## Endpoints
//!
//! ### Markings
//! - `GET /api/me/markings?kind=highlight` - List markings, newest first
//! - `POST /api/me/markings` - Create a note, comment, highlight or bookmark
//! - `PUT /api/me/markings/:id` - Replace the text of a note or comment
//! - `DELETE /api/me/markings/:id` - Delete a marking
//! - `POST /api/me/markings/highlight` - Toggle a highlight
//! - `POST /api/me/markings/bookmark` - Toggle a bookmark
//!
//! ### Reading history
//! - `GET /api/me/history?kind=read&limit=20` - Recent entries
//! - `POST /api/me/history` - Record a read or listen event
//! - `GET /api/me/summary` - Counters and last positions
//!
//! ### Profile
//! - `GET /api/me/profile`
//! - `PUT /api/me/profile`
//!
//! All endpoints require the `x-user-id` header.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use bible_types::{
    HistoryType, MarkingType, NewMarking, NewReadingEntry, Profile, ReadingHistoryEntry,
    UserMarking, UserSummary,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{api_error, ok, user_id, ApiError, ApiResult, AppState};
use crate::annotations::Toggled;

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MarkingsQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub kind: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub verse_id: Uuid,
    #[serde(default)]
    pub color: Option<String>,
}

/// Result of a toggle: `active` is false when the marking was removed
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub active: bool,
    pub marking: Option<UserMarking>,
}

impl From<Toggled> for ToggleResponse {
    fn from(toggled: Toggled) -> Self {
        match toggled {
            Toggled::Added(marking) => Self {
                active: true,
                marking: Some(marking),
            },
            Toggled::Removed => Self {
                active: false,
                marking: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub display_name: Option<String>,
}

fn parse_kind<T>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> Result<Option<T>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Unknown kind '{}'", raw))),
    }
}

// ============================================================================
// Markings
// ============================================================================

/// GET /api/me/markings
async fn list_markings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MarkingsQuery>,
) -> ApiResult<Vec<UserMarking>> {
    let user = user_id(&headers)?;
    let kind = parse_kind(query.kind.as_deref(), MarkingType::parse)?;
    ok(state.annotations.markings(user, kind).await?)
}

/// POST /api/me/markings
async fn create_marking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewMarking>,
) -> ApiResult<UserMarking> {
    let user = user_id(&headers)?;
    ok(state.annotations.add_marking(user, request).await?)
}

/// PUT /api/me/markings/:id
async fn update_marking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(marking_id): Path<Uuid>,
    Json(request): Json<ContentRequest>,
) -> ApiResult<UserMarking> {
    let user = user_id(&headers)?;
    ok(state
        .annotations
        .update_content(user, marking_id, &request.content)
        .await?)
}

/// DELETE /api/me/markings/:id
async fn delete_marking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(marking_id): Path<Uuid>,
) -> ApiResult<Uuid> {
    let user = user_id(&headers)?;
    state.annotations.delete_marking(user, marking_id).await?;
    ok(marking_id)
}

/// POST /api/me/markings/highlight
async fn toggle_highlight(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<ToggleResponse> {
    let user = user_id(&headers)?;
    let toggled = state
        .annotations
        .toggle_highlight(user, request.verse_id, request.color.as_deref())
        .await?;
    ok(toggled.into())
}

/// POST /api/me/markings/bookmark
async fn toggle_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<ToggleResponse> {
    let user = user_id(&headers)?;
    let toggled = state
        .annotations
        .toggle_bookmark(user, request.verse_id)
        .await?;
    ok(toggled.into())
}

// ============================================================================
// Reading history
// ============================================================================

/// GET /api/me/history
async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<ReadingHistoryEntry>> {
    let user = user_id(&headers)?;
    let kind = parse_kind(query.kind.as_deref(), HistoryType::parse)?;
    ok(state.annotations.history(user, kind, query.limit).await?)
}

/// POST /api/me/history
async fn record_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewReadingEntry>,
) -> ApiResult<ReadingHistoryEntry> {
    let user = user_id(&headers)?;
    ok(state.annotations.record_reading(user, request).await?)
}

/// GET /api/me/summary
async fn summary(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<UserSummary> {
    let user = user_id(&headers)?;
    ok(state.annotations.summary(user).await?)
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/me/profile
async fn get_profile(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Profile> {
    let user = user_id(&headers)?;
    match state.annotations.profile(user).await? {
        Some(profile) => ok(profile),
        None => Err(api_error(StatusCode::NOT_FOUND, "No profile yet")),
    }
}

/// PUT /api/me/profile
async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProfileRequest>,
) -> ApiResult<Profile> {
    let user = user_id(&headers)?;
    ok(state
        .annotations
        .update_display_name(user, request.display_name.as_deref())
        .await?)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/me/markings", get(list_markings).post(create_marking))
        .route(
            "/api/me/markings/:id",
            put(update_marking).delete(delete_marking),
        )
        .route("/api/me/markings/highlight", post(toggle_highlight))
        .route("/api/me/markings/bookmark", post(toggle_bookmark))
        .route("/api/me/history", get(list_history).post(record_history))
        .route("/api/me/summary", get(summary))
        .route("/api/me/profile", get(get_profile).put(update_profile))
}
