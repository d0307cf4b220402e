//! Export/import tests: document shape, round-trip, non-atomic import.

mod common;

use axum::http::StatusCode;
use common::{TestServer, create_card, create_deck, get_bytes, json_request, upload_image};
use serde_json::{Value, json};
use std::collections::BTreeSet;

async fn export(server: &TestServer, deck_id: &str) -> Value {
    let (status, bytes) = get_bytes(server.router(), &format!("/decks/{deck_id}/export")).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

async fn card_snapshot(router: &axum::Router, deck_id: &str) -> BTreeSet<String> {
    let (_, cards) = json_request(router, "GET", &format!("/decks/{deck_id}/flashcards"), None).await;
    cards
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            format!(
                "{}|{}|{}|{}",
                c["question"], c["answer"], c["category"], c["hint"]
            )
        })
        .collect()
}

#[tokio::test]
async fn export_document_has_the_expected_shape() {
    let server = TestServer::new().await;
    let deck = create_deck(server.router(), "Spanish").await;
    let deck_id = deck["id"].as_str().unwrap();

    let card = create_card(server.router(), deck_id, "hola", "Greetings").await;
    // Attach an image to prove it stays out of the export.
    upload_image(
        server.router(),
        card["id"].as_str().unwrap(),
        "a.png",
        "image/png",
        b"pixels",
    )
    .await;

    let document = export(&server, deck_id).await;
    assert_eq!(document["version"], "1.0");
    assert_eq!(document["deck"]["name"], "Spanish");
    assert!(document["deck"]["created_at"].is_string());
    assert!(document["export_date"].is_string());

    let cards = document["flashcards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["question"], "hola");
    assert_eq!(cards[0]["category"], "Greetings");
    assert!(cards[0].get("image").is_none());
}

#[tokio::test]
async fn export_of_unknown_deck_is_404() {
    let server = TestServer::new().await;

    let (status, _) = get_bytes(
        server.router(),
        &format!("/decks/{}/export", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_then_import_round_trips_the_cards() {
    let server = TestServer::new().await;
    let deck = create_deck(server.router(), "Spanish").await;
    let deck_id = deck["id"].as_str().unwrap();

    for (question, category) in [("uno", "Numbers"), ("dos", "Numbers"), ("hola", "")] {
        create_card(server.router(), deck_id, question, category).await;
    }

    let document = export(&server, deck_id).await;

    let (status, imported) = json_request(
        server.router(),
        "POST",
        "/decks/import",
        Some(json!({
            "deckData": document["deck"],
            "flashcardsData": document["flashcards"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{imported}");
    assert_eq!(imported["name"], "Spanish");
    assert_eq!(imported["card_count"], 3);
    // The import is a fresh deck, not the original.
    assert_ne!(imported["id"], deck["id"]);

    // Question/answer/category/hint survive as a multiset.
    let original = card_snapshot(server.router(), deck_id).await;
    let copied = card_snapshot(server.router(), imported["id"].as_str().unwrap()).await;
    assert_eq!(original, copied);
}

#[tokio::test]
async fn import_requires_a_deck_name() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        server.router(),
        "POST",
        "/decks/import",
        Some(json!({ "deckData": { "description": "anonymous" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn import_defaults_missing_category_and_hint() {
    let server = TestServer::new().await;

    let (status, imported) = json_request(
        server.router(),
        "POST",
        "/decks/import",
        Some(json!({
            "deckData": { "name": "Minimal", "_id": "ignored", "created_at": "ignored" },
            "flashcardsData": [
                { "question": "q1", "answer": "a1" },
                { "question": "q2", "answer": "a2", "category": "C", "hint": "h" },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{imported}");

    let (_, cards) = json_request(
        server.router(),
        "GET",
        &format!("/decks/{}/flashcards", imported["id"].as_str().unwrap()),
        None,
    )
    .await;
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 2);
    let q1 = cards.iter().find(|c| c["question"] == "q1").unwrap();
    assert_eq!(q1["category"], "");
    assert_eq!(q1["hint"], "");
}

#[tokio::test]
async fn import_without_cards_creates_an_empty_deck() {
    let server = TestServer::new().await;

    let (status, imported) = json_request(
        server.router(),
        "POST",
        "/decks/import",
        Some(json!({ "deckData": { "name": "Empty" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(imported["card_count"], 0);
}

#[tokio::test]
async fn malformed_card_rows_fail_before_anything_is_written() {
    let server = TestServer::new().await;

    let (status, _) = json_request(
        server.router(),
        "POST",
        "/decks/import",
        Some(json!({
            "deckData": { "name": "Partial" },
            "flashcardsData": [ { "question": "q" } ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Schema validation happens before any row is written, so nothing was
    // created here; the deck list stays empty.
    let (_, decks) = json_request(server.router(), "GET", "/decks", None).await;
    assert_eq!(decks.as_array().unwrap().len(), 0);
}
