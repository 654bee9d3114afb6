//! REST API
//!
//! JSON endpoints over the reader, search, Strong's and annotation services.
//! Every response uses the `ApiResponse { success, data, error }` envelope.
//! Per-user endpoints live under `/api/me` and read the caller's id from the
//! `x-user-id` header set by the upstream auth gateway.

pub mod catalog_routes;
pub mod search_routes;
pub mod strongs_routes;
pub mod user_routes;

use std::sync::Arc;

use axum::{http::HeaderMap, http::StatusCode, response::Json, routing::get, Router};
use bible_types::ApiResponse;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use crate::annotations::AnnotationService;
use crate::config::AppConfig;
use crate::error::BibleError;
use crate::reader::ReaderService;
use crate::search::SearchDispatcher;
use crate::store::{AnnotationStore, BibleStore};
use crate::strongs::StrongsResolver;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<ReaderService>,
    pub search: Arc<SearchDispatcher>,
    pub strongs: Arc<StrongsResolver>,
    pub annotations: Arc<AnnotationService>,
}

impl AppState {
    pub fn new(
        bible: Arc<dyn BibleStore>,
        annotations: Arc<dyn AnnotationStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            reader: Arc::new(ReaderService::new(
                bible.clone(),
                config.default_version.clone(),
            )),
            search: Arc::new(SearchDispatcher::with_limit(
                bible.clone(),
                config.text_search_limit,
            )),
            strongs: Arc::new(StrongsResolver::new(
                bible,
                config.default_version.clone(),
                config.strongs_version.clone(),
            )),
            annotations: Arc::new(AnnotationService::new(annotations)),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

impl From<BibleError> for (StatusCode, Json<ApiResponse<()>>) {
    fn from(e: BibleError) -> Self {
        let status = match &e {
            BibleError::InvalidInput(_)
            | BibleError::InvalidStrongsNumber(_)
            | BibleError::InvalidVerseKey(_) => StatusCode::BAD_REQUEST,
            BibleError::NotFound { .. } => StatusCode::NOT_FOUND,
            BibleError::Store(_) | BibleError::Io(_) | BibleError::Serialization(_) => {
                warn!("Request failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        api_error(status, e.to_string())
    }
}

/// Caller id from the auth gateway header
pub fn user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "missing x-user-id header"))?;
    Uuid::parse_str(value.trim())
        .map_err(|_| api_error(StatusCode::UNAUTHORIZED, "x-user-id is not a valid user id"))
}

/// GET /api/health
async fn health_check() -> ApiResult<String> {
    ok("OK".to_string())
}

/// Build the full router: API routes, static files and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(catalog_routes::routes())
        .merge(search_routes::routes())
        .merge(strongs_routes::routes())
        .merge(user_routes::routes())
        // Front-end bundle, if one is deployed next to the binary
        .fallback_service(ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
