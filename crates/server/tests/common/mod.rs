//! Shared integration test harness.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cardbox_core::config::AppConfig;
use cardbox_metadata::{MetadataStore, SqliteStore};
use cardbox_server::{AppState, create_router};
use cardbox_storage::{FilesystemBackend, MediaStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A router wired to throwaway stores.
pub struct TestServer {
    _temp: tempfile::TempDir,
    state: AppState,
    router: Router,
}

impl TestServer {
    pub async fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();

        let media: Arc<dyn MediaStore> = Arc::new(
            FilesystemBackend::new(temp.path().join("uploads"))
                .await
                .unwrap(),
        );
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(temp.path().join("metadata.db"))
                .await
                .unwrap(),
        );

        let state = AppState::new(AppConfig::for_testing(), metadata, media);
        let router = create_router(state.clone());

        Self {
            _temp: temp,
            state,
            router,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    pub fn media(&self) -> Arc<dyn MediaStore> {
        self.state.media.clone()
    }
}

/// Make a JSON request and decode the JSON response.
pub async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Make a raw GET request, returning status and body bytes.
pub async fn get_bytes(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

/// Post a multipart image upload to a flashcard.
pub async fn upload_image(
    router: &Router,
    flashcard_id: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> (StatusCode, Value) {
    let boundary = "cardbox-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(format!("/flashcards/{flashcard_id}/image"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Create a deck through the API and return its JSON.
pub async fn create_deck(router: &Router, name: &str) -> Value {
    let (status, deck) = json_request(
        router,
        "POST",
        "/decks",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "deck creation failed: {deck}");
    deck
}

/// Create a flashcard through the API and return its JSON.
pub async fn create_card(router: &Router, deck_id: &str, question: &str, category: &str) -> Value {
    let (status, card) = json_request(
        router,
        "POST",
        "/flashcards",
        Some(serde_json::json!({
            "deck_id": deck_id,
            "question": question,
            "answer": format!("{question}-answer"),
            "category": category,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "card creation failed: {card}");
    card
}
