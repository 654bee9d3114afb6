//! REST router over the in-memory sample store
//!
//! Run with: cargo test --features server --test api_routes

#![cfg(feature = "server")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use bible_study::api::{create_router, AppState, USER_ID_HEADER};
use bible_study::config::AppConfig;
use bible_study::store::sample::{sample_store, READING_VERSION};
use bible_study::store::{BibleStore, InMemoryBibleStore};

async fn setup() -> (Arc<InMemoryBibleStore>, Router) {
    let store = Arc::new(sample_store().await);
    let state = AppState::new(store.clone(), store.clone(), &AppConfig::default());
    (store, create_router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn user_request(method: &str, uri: &str, user: Uuid, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, user.to_string());
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ============================================================================
// Catalog and search
// ============================================================================

#[tokio::test]
async fn health_and_catalog() {
    let (_, app) = setup().await;

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, get("/api/versions")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/api/books")).await;
    assert_eq!(body["data"][0]["name"], "Genesis");
}

#[tokio::test]
async fn chapter_by_abbreviation() {
    let (_, app) = setup().await;
    let (status, body) = send(&app, get("/api/books/1Joh/chapters/1?version=KR92")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"], "I John");
    assert_eq!(body["data"]["display_name"], "1. Johanneksen kirje");
    assert_eq!(body["data"]["verses"].as_array().unwrap().len(), 5);

    let (status, body) = send(&app, get("/api/books/John/chapters/9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn search_dispatches_references_and_text() {
    let (_, app) = setup().await;

    let (_, body) = send(&app, get("/api/search?q=Matt%205:14&version=KR92")).await;
    assert_eq!(body["data"]["type"], "reference");
    assert_eq!(body["data"]["verses"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, get("/api/search?q=light")).await;
    assert_eq!(body["data"]["type"], "text");
    assert_eq!(body["data"]["verses"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/api/strongs/G25/verses")).await;
    assert_eq!(body["data"]["total_count"], 3);
}

// ============================================================================
// Word study
// ============================================================================

#[tokio::test]
async fn lexicon_card_and_spans() {
    let (_, app) = setup().await;

    let (status, body) = send(&app, get("/api/strongs/H0085")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["strongs_number"], "H85");

    let (_, body) = send(&app, get("/api/spans?text=love%3CG25%3E%20thy%3CG4675%3E%20neighbour")).await;
    let spans = body["data"].as_array().unwrap();
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0], json!({"type": "tagged", "text": "love", "strongs": ["G25"]}));
    assert_eq!(spans[2], json!({"type": "plain", "text": "neighbour"}));
}

#[tokio::test]
async fn study_and_map() {
    let (store, app) = setup().await;

    let (status, body) = send(&app, get("/api/study/Joh/3/16")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["osis"], "John.3.16");
    assert!(!body["data"]["spans"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, get("/api/study/Mal/3/19?version=KR92")).await;
    assert_eq!(body["data"]["osis"], "Malachi.4.1");
    assert_eq!(body["data"]["tagged"]["osis"], "Malachi.4.1");

    let (status, _) = send(&app, get("/api/study/Joh/0/16")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let kr92 = store
        .verse_by_key("Malachi.4.1", READING_VERSION)
        .await
        .unwrap()
        .unwrap();
    let (status, body) = send(&app, get(&format!("/api/verses/{}/map", kr92.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["chapter_number"], 4);
    assert_eq!(body["data"]["verse_number"], 1);
}

// ============================================================================
// Per-user data
// ============================================================================

#[tokio::test]
async fn user_endpoints_require_the_header() {
    let (_, app) = setup().await;
    let (status, body) = send(&app, get("/api/me/markings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn marking_lifecycle() {
    let (store, app) = setup().await;
    let user = Uuid::new_v4();
    let verse = store
        .verse_by_key("John.3.16", READING_VERSION)
        .await
        .unwrap()
        .unwrap();

    let toggle = json!({ "verse_id": verse.id });
    let (status, body) = send(
        &app,
        user_request("POST", "/api/me/markings/highlight", user, Some(toggle.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], true);

    let note = json!({ "verse_id": verse.id, "marking_type": "note", "content": "Evankeliumi" });
    let (_, body) = send(&app, user_request("POST", "/api/me/markings", user, Some(note))).await;
    let note_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, user_request("GET", "/api/me/markings?kind=note", user, None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        user_request("GET", "/api/me/markings?kind=summary", user, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        user_request("DELETE", &format!("/api/me/markings/{}", note_id), user, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        user_request("DELETE", &format!("/api/me/markings/{}", note_id), user, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        user_request("POST", "/api/me/markings/highlight", user, Some(toggle)),
    )
    .await;
    assert_eq!(body["data"]["active"], false);
}

#[tokio::test]
async fn history_summary_and_profile() {
    let (store, app) = setup().await;
    let user = Uuid::new_v4();
    let john = store.book_by_name("John").await.unwrap().unwrap();

    let entry = json!({
        "book_id": john.id,
        "chapter_number": 3,
        "verse_number": 16,
        "history_type": "read",
    });
    let (status, _) = send(&app, user_request("POST", "/api/me/history", user, Some(entry))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, user_request("GET", "/api/me/history?limit=5", user, None)).await;
    assert_eq!(body["data"][0]["book_name"], "John");

    let (_, body) = send(&app, user_request("GET", "/api/me/summary", user, None)).await;
    assert_eq!(body["data"]["last_read"]["chapter_number"], 3);
    assert_eq!(body["data"]["highlights_count"], 0);

    let (status, _) = send(&app, user_request("GET", "/api/me/profile", user, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        user_request("PUT", "/api/me/profile", user, Some(json!({ "display_name": "Maria" }))),
    )
    .await;
    assert_eq!(body["data"]["display_name"], "Maria");
}
